// ==========================================
// 仓库管理系统 - 通用树结构
// ==========================================
// 职责: 插入有序的通用树节点,用于库区层级等展示结构
// 约束: 所有权自上而下,不持有父节点引用
// ==========================================

/// 插入有序的通用树节点
///
/// 子节点按标识符寻址,迭代顺序与插入顺序一致
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode<K, T> {
    data: T,
    children: Vec<(K, TreeNode<K, T>)>,
}

impl<K: PartialEq, T> TreeNode<K, T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            children: Vec::new(),
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub fn set_data(&mut self, data: T) {
        self.data = data;
    }

    /// 按标识符查找直接子节点
    pub fn child(&self, identifier: &K) -> Option<&TreeNode<K, T>> {
        self.children
            .iter()
            .find(|(k, _)| k == identifier)
            .map(|(_, node)| node)
    }

    /// 按标识符查找直接子节点(可变)
    pub fn child_mut(&mut self, identifier: &K) -> Option<&mut TreeNode<K, T>> {
        self.children
            .iter_mut()
            .find(|(k, _)| k == identifier)
            .map(|(_, node)| node)
    }

    /// 挂接子节点;同标识符的旧节点被替换
    pub fn add_child(&mut self, identifier: K, child: TreeNode<K, T>) {
        if let Some(slot) = self.children.iter_mut().find(|(k, _)| *k == identifier) {
            slot.1 = child;
        } else {
            self.children.push((identifier, child));
        }
    }

    /// 摘除子节点,返回被摘除的节点
    pub fn remove_child(&mut self, identifier: &K) -> Option<TreeNode<K, T>> {
        let pos = self.children.iter().position(|(k, _)| k == identifier)?;
        Some(self.children.remove(pos).1)
    }

    /// 按插入顺序迭代直接子节点
    pub fn children(&self) -> impl Iterator<Item = (&K, &TreeNode<K, T>)> {
        self.children.iter().map(|(k, node)| (k, node))
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// 直接子节点数
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}
