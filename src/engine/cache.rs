// Step history for backward navigation

use crate::lang::Language;
use tracing::trace;

/// Operations accepted by [`TransitionCache::apply`]
#[derive(Debug, Clone, PartialEq)]
pub enum CacheAction<S> {
    /// Drop all history and start again from this state
    Clear(S),
    /// Move forward one step, computing it if it is not cached yet
    Next,
    /// Move back one step; a no-op at step 0
    Prev,
}

/// Memoized execution history for one language.
///
/// Entry `i` is the state after `i` steps. Moving forward over history that is
/// already cached never calls the transition function again, so stepping back
/// and forth is O(1) per step.
///
/// When the transition function returns a state equal to its input, nothing is
/// recorded and the cursor stays put: a halted program does not grow history.
#[derive(Debug)]
pub struct TransitionCache<L: Language> {
    language: L,
    states: Vec<L::State>,
    cursor: usize,
}

impl<L: Language> TransitionCache<L> {
    pub fn new(language: L, seed: L::State) -> Self {
        TransitionCache {
            language,
            states: vec![seed],
            cursor: 0,
        }
    }

    /// Apply one cache action and return the state at the (new) cursor
    pub fn apply(&mut self, action: CacheAction<L::State>) -> &L::State {
        match action {
            CacheAction::Clear(seed) => self.clear(seed),
            CacheAction::Next => self.next(),
            CacheAction::Prev => self.prev(),
        }
    }

    /// Reset to a single entry holding `seed`
    pub fn clear(&mut self, seed: L::State) -> &L::State {
        trace!(discarded = self.states.len(), "history cleared");
        self.states.clear();
        self.states.push(seed);
        self.cursor = 0;
        &self.states[0]
    }

    /// Step forward, replaying cached history when available
    pub fn next(&mut self) -> &L::State {
        if self.cursor + 1 < self.states.len() {
            self.cursor += 1;
            return &self.states[self.cursor];
        }

        let next = self.language.step(&self.states[self.cursor]);
        if next != self.states[self.cursor] {
            self.states.push(next);
            self.cursor += 1;
        }
        &self.states[self.cursor]
    }

    /// Step backward; at step 0 the current state is returned unchanged
    pub fn prev(&mut self) -> &L::State {
        self.cursor = self.cursor.saturating_sub(1);
        &self.states[self.cursor]
    }

    pub fn current(&self) -> &L::State {
        &self.states[self.cursor]
    }

    /// Cached state at a step index
    pub fn get(&self, step: usize) -> Option<&L::State> {
        self.states.get(step)
    }

    /// Number of steps taken from the seed
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of cached entries (always at least one)
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Never true: the seed is always cached
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn can_step_back(&self) -> bool {
        self.cursor > 0
    }

    /// Cached steps ahead of the cursor
    pub fn ahead(&self) -> usize {
        self.states.len() - self.cursor - 1
    }

    pub fn language(&self) -> &L {
        &self.language
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{MachineState, Program, StateView, StunStep};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts how often `step` runs
    #[derive(Debug, Default)]
    struct Counter {
        calls: Rc<Cell<usize>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Count(u32);

    impl MachineState for Count {
        fn is_end(&self) -> bool {
            self.0 >= 3
        }

        fn view(&self) -> StateView {
            StateView {
                register: i64::from(self.0),
                end: self.is_end(),
                ..StateView::default()
            }
        }
    }

    impl Language for Counter {
        type State = Count;

        const NAME: &'static str = "counter";
        const DISPLAYS: crate::lang::Displays = crate::lang::Displays {
            tape: false,
            output: false,
            register: true,
            fast_forward: true,
        };

        fn seed(&self, _program: &Program) -> Count {
            Count(0)
        }

        fn step(&self, state: &Count) -> Count {
            self.calls.set(self.calls.get() + 1);
            Count((state.0 + 1).min(3))
        }
    }

    fn counter() -> (TransitionCache<Counter>, Rc<Cell<usize>>) {
        let lang = Counter::default();
        let calls = Rc::clone(&lang.calls);
        (TransitionCache::new(lang, Count(0)), calls)
    }

    #[test]
    fn test_next_computes_and_advances() {
        let (mut cache, calls) = counter();
        assert_eq!(cache.next(), &Count(1));
        assert_eq!(cache.next(), &Count(2));
        assert_eq!(cache.cursor(), 2);
        assert_eq!(cache.len(), 3);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_replay_does_not_recompute() {
        let (mut cache, calls) = counter();
        cache.next();
        cache.next();
        cache.prev();
        cache.prev();
        assert_eq!(cache.current(), &Count(0));
        assert_eq!(cache.ahead(), 2);

        assert_eq!(cache.next(), &Count(1));
        assert_eq!(cache.next(), &Count(2));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_prev_at_start_is_a_no_op() {
        let (mut cache, _) = counter();
        assert!(!cache.can_step_back());
        assert_eq!(cache.prev(), &Count(0));
        assert_eq!(cache.cursor(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_fixpoint_is_not_recorded() {
        let (mut cache, calls) = counter();
        for _ in 0..10 {
            cache.next();
        }
        assert_eq!(cache.current(), &Count(3));
        assert_eq!(cache.cursor(), 3);
        assert_eq!(cache.len(), 4);
        // three real steps, then one attempt per remaining call
        assert_eq!(calls.get(), 10);
    }

    #[test]
    fn test_clear_discards_history() {
        let (mut cache, _) = counter();
        cache.next();
        cache.next();
        assert_eq!(cache.apply(CacheAction::Clear(Count(0))), &Count(0));
        assert_eq!(cache.cursor(), 0);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.ahead(), 0);
    }

    #[test]
    fn test_apply_dispatches() {
        let (mut cache, _) = counter();
        assert_eq!(cache.apply(CacheAction::Next), &Count(1));
        assert_eq!(cache.apply(CacheAction::Prev), &Count(0));
    }

    #[test]
    fn test_wraps_a_real_language() {
        let seed = StunStep.seed(&Program::Text("+-".to_string()));
        let mut cache = TransitionCache::new(StunStep, seed);
        assert_eq!(cache.next().tape, vec![1]);
        assert_eq!(cache.next().tape, vec![0]);
        assert_eq!(cache.prev().tape, vec![1]);
        assert_eq!(cache.get(0).map(|s| s.tape.clone()), Some(vec![0]));
    }
}
