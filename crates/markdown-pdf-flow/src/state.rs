use crate::block::RenderBlock;

/// Pending bullet accumulator for a single `build` pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    Accumulating(Vec<String>),
}

impl FlowState {
    pub fn new() -> Self {
        FlowState::Idle
    }

    pub fn push_bullet(&mut self, text: String) {
        match self {
            FlowState::Idle => *self = FlowState::Accumulating(vec![text]),
            FlowState::Accumulating(items) => items.push(text),
        }
    }

    /// Returns the pending list, if any, and resets to `Idle`.
    pub fn flush(&mut self) -> Option<RenderBlock> {
        match std::mem::take(self) {
            FlowState::Idle => None,
            FlowState::Accumulating(items) => Some(RenderBlock::List { items }),
        }
    }

    pub fn flush_into(&mut self, blocks: &mut Vec<RenderBlock>) {
        if let Some(list) = self.flush() {
            blocks.push(list);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_flush_emits_nothing() {
        let mut state = FlowState::new();
        assert_eq!(state.flush(), None);
        assert_eq!(state, FlowState::Idle);
    }

    #[test]
    fn flush_returns_items_in_order_and_resets() {
        let mut state = FlowState::new();
        state.push_bullet("a".into());
        state.push_bullet("b".into());
        assert_eq!(
            state,
            FlowState::Accumulating(vec!["a".to_string(), "b".to_string()])
        );

        assert_eq!(state.flush(), Some(RenderBlock::list(["a", "b"])));
        assert_eq!(state, FlowState::Idle);
    }
}
