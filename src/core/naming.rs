//! Lifecycle event name derivation.
//!
//! Event names are derived from raw state and transition names with a
//! word-boundary aware camel-case convention: `warm-up` becomes `warmUp`,
//! and prefixing it with `onBefore` yields `onBeforeWarmUp`. The engine
//! treats the results as opaque keys.

/// Convert a raw label to lower camel case.
///
/// Words are separated by `_` or `-`. A single word whose first character
/// is already lowercase is returned untouched, so `doStuff` keeps its
/// inner capitals.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::core::naming::camelize;
///
/// assert_eq!(camelize("walk"), "walk");
/// assert_eq!(camelize("warm-up"), "warmUp");
/// assert_eq!(camelize("SHUT_DOWN"), "shutDown");
/// assert_eq!(camelize("Idle"), "idle");
/// ```
pub fn camelize(label: &str) -> String {
    let mut words = label.split(['_', '-']);
    let Some(first) = words.next() else {
        return String::new();
    };

    let is_single = !label.contains(['_', '-']);
    if is_single && first.chars().next().map_or(true, |c| !c.is_uppercase()) {
        return label.to_string();
    }

    let mut result = first.to_lowercase();
    for word in words {
        result.push_str(&capitalize(&word.to_lowercase()));
    }
    result
}

/// Prefix a camel-cased label, capitalizing its first character.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::core::naming::prepended;
///
/// assert_eq!(prepended("onBefore", "walk"), "onBeforeWalk");
/// assert_eq!(prepended("onEnter", "warm-up"), "onEnterWarmUp");
/// ```
pub fn prepended(prefix: &str, label: &str) -> String {
    let mut name = String::from(prefix);
    name.push_str(&capitalize(&camelize(label)));
    name
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_label_stays_empty() {
        assert_eq!(camelize(""), "");
        assert_eq!(prepended("on", ""), "on");
    }

    #[test]
    fn lowercase_single_word_is_untouched() {
        assert_eq!(camelize("walk"), "walk");
        assert_eq!(camelize("doStuff"), "doStuff");
    }

    #[test]
    fn capitalized_single_word_is_lowered() {
        assert_eq!(camelize("Idle"), "idle");
        assert_eq!(camelize("IDLE"), "idle");
    }

    #[test]
    fn separators_start_new_words() {
        assert_eq!(camelize("warm-up"), "warmUp");
        assert_eq!(camelize("shut_down"), "shutDown");
        assert_eq!(camelize("Power-OFF_now"), "powerOffNow");
    }

    #[test]
    fn symbols_pass_through() {
        assert_eq!(camelize("*"), "*");
        assert_eq!(prepended("onEnter", "*"), "onEnter*");
    }

    #[test]
    fn prepended_builds_event_names() {
        assert_eq!(prepended("onBefore", "walk"), "onBeforeWalk");
        assert_eq!(prepended("onAfter", "Walk"), "onAfterWalk");
        assert_eq!(prepended("onLeave", "none"), "onLeaveNone");
        assert_eq!(prepended("on", "half-open"), "onHalfOpen");
    }
}
