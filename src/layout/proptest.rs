//! Property-based tests for the collision resolver using proptest.
//!
//! These tests check the layout invariants over arbitrary arrival
//! sequences:
//!
//! - No two live bubbles overlap after any placement or tick
//! - Identical arrival sequences produce identical layouts
//! - Ticks and placements never move a bubble down
//! - Eviction removes exactly the bubbles past twice their height

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::bubble::testing::bubble;
    use crate::bubble::BubbleId;
    use crate::eviction::{evict_hidden, is_hidden};
    use crate::layout::{find_overlap, place, LayoutMode};
    use crate::registry::BubbleRegistry;

    const CONTAINER: f32 = 200.0;

    #[derive(Debug, Clone)]
    enum Step {
        Arrive { left: f32, top: f32, width: f32, height: f32 },
        Tick,
    }

    // Fractional geometry, like centred anchors and ratio-scaled containers.
    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            4 => (0.0f32..300.0, 0.0f32..200.0, 20.0f32..120.0, 10.0f32..40.0).prop_map(
                |(left, top, width, height)| Step::Arrive { left, top, width, height }
            ),
            1 => Just(Step::Tick),
        ]
    }

    fn mode() -> impl Strategy<Value = LayoutMode> {
        prop_oneof![Just(LayoutMode::FreeFlow), Just(LayoutMode::Constrained)]
    }

    fn run(mode: LayoutMode, steps: &[Step]) -> BubbleRegistry {
        let mut registry = BubbleRegistry::new();
        for (i, step) in steps.iter().enumerate() {
            apply(mode, &mut registry, i as u64, step);
        }
        registry
    }

    fn apply(mode: LayoutMode, registry: &mut BubbleRegistry, id: u64, step: &Step) {
        match *step {
            Step::Arrive { left, top, width, height } => {
                let candidate = bubble(id, left, top, width, height);
                place(mode, registry, candidate, CONTAINER);
            }
            Step::Tick => {
                registry.lift_all(15.0);
                evict_hidden(registry);
            }
        }
    }

    fn layout(registry: &BubbleRegistry) -> Vec<(BubbleId, f32, f32)> {
        registry.iter().map(|b| (b.id(), b.left(), b.top())).collect()
    }

    proptest! {
        /// No pair of live bubbles overlaps after any step.
        #[test]
        fn no_overlap_after_every_step(
            mode in mode(),
            steps in prop::collection::vec(step(), 1..40)
        ) {
            let mut registry = BubbleRegistry::new();
            for (i, step) in steps.iter().enumerate() {
                apply(mode, &mut registry, i as u64, step);
                prop_assert_eq!(
                    find_overlap(&registry),
                    None,
                    "overlap after step {} ({:?})",
                    i,
                    step
                );
            }
        }

        /// Two runs over the same arrivals produce the same layout.
        #[test]
        fn placement_is_deterministic(
            mode in mode(),
            steps in prop::collection::vec(step(), 1..40)
        ) {
            let first = run(mode, &steps);
            let second = run(mode, &steps);
            prop_assert_eq!(layout(&first), layout(&second));
        }

        /// A bubble's top never increases once it is live.
        #[test]
        fn tops_are_monotonic(
            mode in mode(),
            steps in prop::collection::vec(step(), 1..40)
        ) {
            let mut registry = BubbleRegistry::new();
            let mut previous: Vec<(BubbleId, f32)> = Vec::new();
            for (i, step) in steps.iter().enumerate() {
                apply(mode, &mut registry, i as u64, step);
                for (id, top) in &previous {
                    if let Some(bubble) = registry.get(*id) {
                        prop_assert!(
                            bubble.top() <= *top,
                            "{} moved down from {} to {}",
                            id,
                            top,
                            bubble.top()
                        );
                    }
                }
                previous = registry.iter().map(|b| (b.id(), b.top())).collect();
            }
        }

        /// Nothing hidden survives a step, and eviction keeps arrival order.
        #[test]
        fn nothing_hidden_survives(
            mode in mode(),
            steps in prop::collection::vec(step(), 1..40)
        ) {
            let registry = run(mode, &steps);
            prop_assert!(registry.iter().all(|b| !is_hidden(b)));

            let ids: Vec<u64> = registry.iter().map(|b| b.id().0).collect();
            let mut sorted = ids.clone();
            sorted.sort_unstable();
            prop_assert_eq!(ids, sorted);
        }
    }
}
