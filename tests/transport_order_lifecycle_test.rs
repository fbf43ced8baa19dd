// ==========================================
// 运输订单生命周期集成测试
// ==========================================
// 测试目标: 验证完整的创建 → 绑定 → 初始化 → 启动 → 完成流程,
//           以及全部非法转换路径
// ==========================================


use warehouse_wms::domain::types::TransportOrderState::*;
use warehouse_wms::logging;
use warehouse_wms::service::{ServiceError, TransportOrderService};

#[test]
fn test_complete_lifecycle_scenario() {
    logging::init_test();

    // 步骤 1: 创建测试数据库与基础数据
    let (_temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let conn = test_helpers::open_test_connection(&db_path).expect("Failed to open db");
    let unit_id = test_helpers::insert_transport_unit(&conn, "TU-1000").unwrap();
    let location_id = test_helpers::insert_location(&conn, "A/01/01/01").unwrap();
    drop(conn);

    let service = TransportOrderService::new(&db_path).expect("Failed to create service");

    // 步骤 2: 创建订单(未绑定运输单元)
    let order = service.create_order(None, 3).unwrap();
    let order_id = order.id.unwrap();
    assert_eq!(order.state(), Created);
    assert!(order.start_date().is_none());

    // 步骤 3: 未绑定时初始化必须失败(前置条件)
    let result = service.change_state(order_id, "INITIALIZED");
    assert!(matches!(result, Err(ServiceError::MissingPrecondition(_))));

    // 步骤 4: 绑定运输单元与目标库位后初始化成功
    service
        .bind_targets(order_id, Some(unit_id), None, Some(location_id), None)
        .unwrap();
    let order = service.change_state(order_id, "INITIALIZED").unwrap();
    assert_eq!(order.state(), Initialized);

    // 步骤 5: 启动,启动时间被写入
    let order = service.change_state(order_id, "STARTED").unwrap();
    assert_eq!(order.state(), Started);
    assert!(order.start_date().is_some());

    // 步骤 6: 回退被拒绝
    let result = service.change_state(order_id, "CREATED");
    match result {
        Err(ServiceError::IllegalStateTransition { from, to }) => {
            assert_eq!(from, "STARTED");
            assert_eq!(to, "CREATED");
        }
        other => panic!("应拒绝回退, 实际: {other:?}"),
    }

    // 步骤 7: 完成
    let order = service.change_state(order_id, "FINISHED").unwrap();
    assert_eq!(order.state(), Finished);
}

#[test]
fn test_created_must_initialize_first() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();
    let unit_id = test_helpers::insert_transport_unit(&conn, "TU-2000").unwrap();
    let location_id = test_helpers::insert_location(&conn, "B/01/01/01").unwrap();
    drop(conn);

    let service = TransportOrderService::new(&db_path).unwrap();
    let order = service.create_order(Some(unit_id), 0).unwrap();
    let order_id = order.id.unwrap();
    service
        .bind_targets(order_id, None, None, Some(location_id), None)
        .unwrap();

    // 前置条件满足,但 CREATED 之后仍只允许 INITIALIZED
    for target in ["STARTED", "INTERRUPTED", "ONFAILURE", "FINISHED"] {
        let result = service.change_state(order_id, target);
        assert!(
            matches!(result, Err(ServiceError::IllegalStateTransition { .. })),
            "CREATED -> {target} 应被拒绝"
        );
    }

    // 状态未被部分修改
    let order = service.load_order(order_id).unwrap();
    assert_eq!(order.state(), Created);
}

#[test]
fn test_unknown_state_string_is_invalid_input() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let service = TransportOrderService::new(&db_path).unwrap();
    let order = service.create_order(None, 0).unwrap();
    let order_id = order.id.unwrap();

    for raw in ["", "  ", "CANCELLED", "started!"] {
        let result = service.change_state(order_id, raw);
        assert!(
            matches!(result, Err(ServiceError::InvalidInput(_))),
            "输入 {raw:?} 应报无效输入"
        );
    }
}

#[test]
fn test_interrupted_cannot_resume() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();
    let unit_id = test_helpers::insert_transport_unit(&conn, "TU-3000").unwrap();
    let location_id = test_helpers::insert_location(&conn, "C/01/01/01").unwrap();
    drop(conn);

    let service = TransportOrderService::new(&db_path).unwrap();
    let order = service.create_order(Some(unit_id), 0).unwrap();
    let order_id = order.id.unwrap();
    service
        .bind_targets(order_id, None, None, Some(location_id), None)
        .unwrap();

    service.change_state(order_id, "INITIALIZED").unwrap();
    service.change_state(order_id, "STARTED").unwrap();
    let order = service.change_state(order_id, "INTERRUPTED").unwrap();
    assert_eq!(order.state(), Interrupted);

    // 中断后禁止回到 STARTED,只能走 ONFAILURE / FINISHED
    assert!(matches!(
        service.change_state(order_id, "STARTED"),
        Err(ServiceError::IllegalStateTransition { .. })
    ));
    let order = service.change_state(order_id, "ONFAILURE").unwrap();
    assert_eq!(order.state(), OnFailure);
    let order = service.change_state(order_id, "FINISHED").unwrap();
    assert_eq!(order.state(), Finished);
}

#[test]
fn test_problem_report_keeps_state() {
    let (_temp_file, db_path) = test_helpers::create_test_db().unwrap();
    let service = TransportOrderService::new(&db_path).unwrap();

    let order = service.create_order(None, 0).unwrap();
    let order_id = order.id.unwrap();

    let order = service
        .report_problem(order_id, 7001, "目标库区已满")
        .unwrap();
    let problem = order.problem.as_ref().expect("问题记录应已保存");
    assert_eq!(problem.message_no, 7001);
    assert_eq!(problem.message, "目标库区已满");
    assert_eq!(order.state(), Created);

    // 再次上报覆盖旧记录
    let order = service.report_problem(order_id, 7002, "恢复").unwrap();
    assert_eq!(order.problem.unwrap().message_no, 7002);
}
