use super::*;

#[test]
fn default_is_empty() {
    assert!(EvalFlags::default().is_empty());
}

#[test]
fn flags_are_distinct_bits() {
    let all = [
        EvalFlags::IS_SCRIPT,
        EvalFlags::CACHE_RESULTS,
        EvalFlags::SPECPARAMS_ALLOWED,
        EvalFlags::COVERGROUP_EXPR,
        EvalFlags::ALLOW_UNBOUNDED_PLACEHOLDER,
    ];
    let combined = all.iter().fold(EvalFlags::empty(), |acc, f| acc | *f);
    assert_eq!(combined, EvalFlags::all());
    assert_eq!(combined.bits().count_ones(), 5);
}

#[test]
fn set_and_remove() {
    let mut flags = EvalFlags::CACHE_RESULTS | EvalFlags::IS_SCRIPT;
    flags.remove(EvalFlags::CACHE_RESULTS);
    assert!(!flags.contains(EvalFlags::CACHE_RESULTS));
    flags.set(EvalFlags::CACHE_RESULTS, true);
    assert!(flags.contains(EvalFlags::CACHE_RESULTS | EvalFlags::IS_SCRIPT));
}
