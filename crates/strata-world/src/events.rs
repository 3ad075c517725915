use glam::IVec3;

/// Notifications the world queues for the host. Delivered by the world, not
/// by chunks calling back; the host drains them once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    ChunkLoaded { chunk_pos: IVec3 },
    ChunkUnloaded { chunk_pos: IVec3 },
    /// One-shot signal emitted when the memory estimate first crosses the
    /// budget; re-armed once usage drops back under it.
    BudgetExceeded { used_mb: f32, budget_mb: f32 },
}
