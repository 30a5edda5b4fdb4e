#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    FetchLastRefresh { request: crate::RequestId },
    TriggerRefresh,
}
