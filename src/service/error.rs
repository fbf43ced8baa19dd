// ==========================================
// 仓库管理系统 - 服务层错误类型
// ==========================================
// 职责: 将领域错误与仓储错误转换为调用方可读的错误
// 约束: 错误信息必须包含显式原因
// ==========================================

use crate::domain::error::TransportOrderError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 服务层错误类型
#[derive(Error, Debug)]
pub enum ServiceError {
    // ===== 输入校验错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ===== 业务规则错误 =====
    #[error("非法状态转换: from={from} to={to}")]
    IllegalStateTransition { from: String, to: String },

    #[error("前置条件不满足: {0}")]
    MissingPrecondition(String),

    // ===== 并发控制错误 =====
    #[error("乐观锁冲突: {0}")]
    OptimisticLockFailure(String),

    // ===== 数据访问错误 =====
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 从仓储层错误转换
impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::OptimisticLockFailure {
                entity,
                id,
                expected,
                actual,
            } => ServiceError::OptimisticLockFailure(format!(
                "{entity}(id={id})已被其他事务修改(期望version={expected},实际version={actual})"
            )),
            RepositoryError::NotFound { entity, id } => {
                ServiceError::NotFound(format!("{entity}(id={id})不存在"))
            }
            RepositoryError::UniqueConstraintViolation(msg) => {
                ServiceError::InvalidInput(format!("唯一约束违反: {msg}"))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ServiceError::InvalidInput(format!("外键约束违反: {msg}"))
            }
            RepositoryError::FieldValueError { field, message } => {
                ServiceError::InvalidInput(format!("字段{field}错误: {message}"))
            }
            RepositoryError::DatabaseConnectionError(msg)
            | RepositoryError::LockError(msg)
            | RepositoryError::DatabaseQueryError(msg) => ServiceError::DatabaseError(msg),
            RepositoryError::InternalError(msg) => ServiceError::InternalError(msg),
            RepositoryError::Other(err) => ServiceError::Other(err),
        }
    }
}

// 从领域层错误转换
impl From<TransportOrderError> for ServiceError {
    fn from(err: TransportOrderError) -> Self {
        match err {
            TransportOrderError::IllegalTransition { from, to } => {
                ServiceError::IllegalStateTransition {
                    from: from.to_string(),
                    to: to.to_string(),
                }
            }
            TransportOrderError::MissingPrecondition { reason } => {
                ServiceError::MissingPrecondition(reason)
            }
        }
    }
}

/// Result 类型别名
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TransportOrderState;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "TransportOrder".to_string(),
            id: "42".to_string(),
        };
        let svc_err: ServiceError = repo_err.into();
        match svc_err {
            ServiceError::NotFound(msg) => {
                assert!(msg.contains("TransportOrder"));
                assert!(msg.contains("42"));
            }
            _ => panic!("Expected NotFound"),
        }

        let repo_err = RepositoryError::OptimisticLockFailure {
            entity: "TransportOrder".to_string(),
            id: 7,
            expected: 1,
            actual: 2,
        };
        let svc_err: ServiceError = repo_err.into();
        assert!(matches!(svc_err, ServiceError::OptimisticLockFailure(_)));
    }

    #[test]
    fn test_domain_error_conversion() {
        let err = TransportOrderError::IllegalTransition {
            from: TransportOrderState::Started,
            to: TransportOrderState::Created,
        };
        let svc_err: ServiceError = err.into();
        match svc_err {
            ServiceError::IllegalStateTransition { from, to } => {
                assert_eq!(from, "STARTED");
                assert_eq!(to, "CREATED");
            }
            _ => panic!("Expected IllegalStateTransition"),
        }
    }
}
