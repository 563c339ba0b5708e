//! Macros for ergonomic state machine construction.

/// Declare a list of literal transitions.
///
/// Each entry is `name: from => to`. The source may be a single state, a
/// bracketed list of states or `*` for any state; the target may be a state
/// or `*` to stay put. Expands to a `Vec<TransitionDef<D, A>>`.
///
/// # Example
///
/// ```
/// use lifecycle_fsm::builder::{StateMachineBuilder, TransitionDef};
/// use lifecycle_fsm::transitions;
///
/// let defs: Vec<TransitionDef<(), ()>> = transitions! {
///     "warn": "green" => "yellow",
///     "stop": ["yellow", "green"] => "red",
///     "panic": * => "red",
///     "hold": "red" => *,
/// };
///
/// let fsm = StateMachineBuilder::<(), ()>::new()
///     .init("green")
///     .transitions(defs)
///     .build()
///     .unwrap();
///
/// assert_eq!(fsm.all_states(), vec!["none", "green", "yellow", "red"]);
/// ```
#[macro_export]
macro_rules! transitions {
    (@from *) => {
        ::std::vec::Vec::<::std::string::String>::new()
    };
    (@from [$($from:expr),* $(,)?]) => {
        ::std::vec![$(::std::string::String::from($from)),*]
    };
    (@from $from:expr) => {
        ::std::vec![::std::string::String::from($from)]
    };
    (@to *) => {
        $crate::core::Target::Wildcard
    };
    (@to $to:expr) => {
        $crate::core::Target::literal($to)
    };
    ($($name:literal : $from:tt => $to:tt),* $(,)?) => {
        ::std::vec![
            $(
                $crate::builder::TransitionDef::new(
                    $name,
                    $crate::transitions!(@from $from),
                    $crate::transitions!(@to $to),
                )
            ),*
        ]
    };
}

#[cfg(test)]
mod tests {
    use crate::builder::TransitionDef;
    use crate::core::Target;

    #[test]
    fn transitions_macro_expands_sources() {
        let defs: Vec<TransitionDef<(), ()>> = transitions! {
            "walk": "idle" => "walking",
            "stop": ["walking", "running"] => "idle",
            "panic": * => "panicking",
        };

        assert_eq!(defs.len(), 3);
        assert_eq!(defs[0].sources(), vec!["idle"]);
        assert_eq!(defs[1].sources(), vec!["walking", "running"]);
        assert_eq!(defs[2].sources(), vec!["*"]);
        assert!(matches!(&defs[2].to, Target::State(name) if name == "panicking"));
    }

    #[test]
    fn transitions_macro_supports_stay_target() {
        let defs: Vec<TransitionDef<(), ()>> = transitions! {
            "noop": "idle" => *
        };

        assert_eq!(defs[0].name, "noop");
        assert!(matches!(defs[0].to, Target::Wildcard));
    }

    #[test]
    fn transitions_macro_accepts_empty_input() {
        let defs: Vec<TransitionDef<u8, ()>> = transitions! {};
        assert!(defs.is_empty());
    }
}
