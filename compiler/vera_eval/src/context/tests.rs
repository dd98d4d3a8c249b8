use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use vera_diagnostic::{DiagnosticQueue, Severity};

fn int(v: i64) -> ConstantValue {
    ConstantValue::Integer(v)
}

/// A unit with one function `f(x)` declared at 100..110.
fn unit_with_function() -> (CompilationUnit, SubroutineId, SymbolId) {
    let mut unit = CompilationUnit::new();
    let f = unit.declare_function("f", Span::new(100, 110));
    let x = unit.add_param(f, "x", Span::new(102, 103));
    (unit, f, x)
}

fn limits(max_call_depth: usize, max_steps: u64, max_backtrace: usize) -> EvalLimits {
    EvalLimits::default()
        .with_max_call_depth(max_call_depth)
        .with_max_steps(max_steps)
        .with_max_backtrace(max_backtrace)
}

// Locals

#[test]
fn locals_without_a_frame_live_in_the_root_scope() {
    let (unit, _, x) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());
    let r = ctx.create_local(x, int(4));
    assert_eq!(ctx.find_local(x), Some(r));
    assert_eq!(ctx.local(r), Some(&int(4)));
    assert_eq!(ctx.top_frame().subroutine(), None);
}

#[test]
fn redeclared_local_keeps_its_handle() {
    let (unit, _, x) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());
    let a = ctx.create_local(x, int(1));
    let b = ctx.create_local(x, int(2));
    assert_eq!(a, b);
    assert_eq!(ctx.local(a), Some(&int(2)));
}

#[test]
fn local_mut_writes_through_the_handle() {
    let (unit, _, x) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());
    let r = ctx.create_local(x, int(1));
    if let Some(v) = ctx.local_mut(r) {
        *v = int(7);
    }
    assert_eq!(ctx.find_local_value(x), Some(&int(7)));
}

#[test]
fn deleted_local_dangles() {
    let (unit, _, x) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());
    let r = ctx.create_local(x, int(1));
    ctx.delete_local(x);
    assert_eq!(ctx.find_local(x), None);
    assert_eq!(ctx.local(r), None);
}

#[test]
fn outer_frame_locals_are_invisible() {
    let (unit, f, x) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());
    let outer = ctx.create_local(x, int(1));

    assert!(ctx.push_frame(f, Span::point(5), LookupLocation::NONE));
    assert_eq!(ctx.find_local(x), None);
    let inner = ctx.create_local(x, int(2));
    assert_ne!(outer, inner);
    assert_eq!(ctx.find_local_value(x), Some(&int(2)));

    ctx.pop_frame();
    assert_eq!(ctx.find_local_value(x), Some(&int(1)));
    assert_eq!(ctx.local(inner), None);
}

#[test]
fn handles_into_popped_frames_never_alias_new_frames() {
    let (unit, f, x) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());
    assert!(ctx.push_frame(f, Span::point(1), LookupLocation::NONE));
    let stale = ctx.create_local(x, int(1));
    ctx.pop_frame();

    assert!(ctx.push_frame(f, Span::point(2), LookupLocation::NONE));
    let fresh = ctx.create_local(x, int(2));
    assert_ne!(stale.frame(), fresh.frame());
    assert_eq!(ctx.local(stale), None);
    assert_eq!(ctx.local(fresh), Some(&int(2)));
    ctx.pop_frame();
}

// Call stack

#[test]
fn push_and_pop_balance() {
    let (unit, f, _) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());
    for _ in 0..4 {
        assert!(ctx.push_frame(f, Span::DUMMY, LookupLocation::NONE));
    }
    ctx.push_empty_frame();
    assert_eq!(ctx.depth(), 5);
    assert!(ctx.in_function());
    for _ in 0..5 {
        ctx.pop_frame();
    }
    assert_eq!(ctx.depth(), 0);
    assert!(!ctx.in_function());
}

#[test]
#[should_panic(expected = "pop_frame called with no active frame")]
fn pop_frame_underflow_panics() {
    let (unit, _, _) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());
    ctx.pop_frame();
}

#[test]
fn recursion_limit_rejects_the_push_past_max() {
    let (unit, f, _) = unit_with_function();
    let mut ctx = EvalContext::with_limits(&unit, EvalFlags::empty(), limits(3, 100, 10));

    for i in 0..3 {
        assert!(ctx.push_frame(f, Span::point(i * 10), LookupLocation::NONE));
    }
    assert!(!ctx.push_frame(f, Span::point(30), LookupLocation::NONE));

    assert_eq!(ctx.depth(), 3);
    assert_eq!(ctx.top_frame().call_location(), Span::point(20));
    assert_eq!(ctx.diagnostics().len(), 1);

    let diag = ctx.diagnostics().iter().next().unwrap();
    assert_eq!(diag.code, ErrorCode::E6001);
    assert_eq!(diag.primary_span(), Some(Span::new(100, 110)));
    assert!(diag.message.contains("maximum depth of 3"));
    assert_eq!(diag.notes.len(), 3);
}

#[test]
fn empty_frames_ignore_the_depth_limit() {
    let (unit, _, _) = unit_with_function();
    let mut ctx = EvalContext::with_limits(&unit, EvalFlags::empty(), limits(1, 100, 10));
    ctx.push_empty_frame();
    ctx.push_empty_frame();
    assert_eq!(ctx.depth(), 2);
    assert!(ctx.diagnostics().is_empty());
}

// Steps

#[test]
fn step_limit_fails_on_the_step_past_max() {
    let (unit, _, _) = unit_with_function();
    let mut ctx = EvalContext::with_limits(&unit, EvalFlags::empty(), limits(8, 5, 10));

    for i in 0..5 {
        assert!(ctx.step(Span::point(i)));
    }
    assert!(ctx.diagnostics().is_empty());

    assert!(!ctx.step(Span::point(42)));
    assert_eq!(ctx.steps(), 6);
    let diag = ctx.diagnostics().last().unwrap();
    assert_eq!(diag.code, ErrorCode::E6002);
    assert_eq!(diag.primary_span(), Some(Span::point(42)));
}

#[test]
fn step_keeps_failing_until_reset() {
    let (unit, _, _) = unit_with_function();
    let mut ctx = EvalContext::with_limits(&unit, EvalFlags::empty(), limits(8, 2, 10));
    assert!(ctx.step(Span::DUMMY));
    assert!(ctx.step(Span::DUMMY));
    assert!(!ctx.step(Span::DUMMY));
    assert!(!ctx.step(Span::DUMMY));
    assert!(ctx.try_step(Span::DUMMY).is_err());

    ctx.reset();
    assert_eq!(ctx.steps(), 0);
    assert!(ctx.step(Span::DUMMY));
}

// L-values

#[test]
fn lvalue_stack_is_last_in_first_out() {
    let (unit, _, x) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());
    let r = ctx.create_local(x, int(0));
    assert!(ctx.top_lvalue().is_none());

    ctx.push_lvalue(LValue::new(r));
    ctx.push_lvalue(LValue::new(r).select(crate::Selector::Index(1)));
    assert_eq!(ctx.top_lvalue().map(|lv| lv.path().len()), Some(1));
    assert_eq!(ctx.pop_lvalue().path().len(), 1);
    assert_eq!(ctx.pop_lvalue(), LValue::new(r));
    assert!(ctx.top_lvalue().is_none());
}

#[test]
#[should_panic(expected = "pop_lvalue called with no l-value in flight")]
fn pop_lvalue_underflow_panics() {
    let (unit, _, _) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());
    ctx.pop_lvalue();
}

// Signals

#[test]
fn disable_target_set_get_clear() {
    let mut unit = CompilationUnit::new();
    let block = unit.add_block("outer", Span::new(0, 40));
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());
    assert_eq!(ctx.disable_target(), None);

    ctx.set_disable_target(Some(block), Span::new(10, 23));
    assert_eq!(ctx.disable_target(), Some(block));
    assert_eq!(ctx.disable_range(), Span::new(10, 23));

    ctx.set_disable_target(None, Span::DUMMY);
    assert_eq!(ctx.disable_target(), None);
}

#[test]
fn queue_target_returns_the_previous_value() {
    let (unit, _, _) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());
    let q = ConstantValue::Queue(vec![int(1), int(2)]);
    assert_eq!(ctx.set_queue_target(Some(q.clone())), None);
    assert_eq!(ctx.queue_target(), Some(&q));
    assert_eq!(ctx.set_queue_target(None), Some(q));
    assert_eq!(ctx.queue_target(), None);
}

#[test]
fn cache_results_requires_the_flag_and_no_frame() {
    let (unit, f, _) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::CACHE_RESULTS);
    assert!(ctx.cache_results());
    assert!(ctx.push_frame(f, Span::DUMMY, LookupLocation::NONE));
    assert!(!ctx.cache_results());
    ctx.pop_frame();
    assert!(ctx.cache_results());

    let plain = EvalContext::new(&unit, EvalFlags::empty());
    assert!(!plain.cache_results());
}

#[test]
fn request_flags_pass_through_to_callers() {
    let unit = CompilationUnit::new();
    let request = EvalFlags::IS_SCRIPT | EvalFlags::SPECPARAMS_ALLOWED | EvalFlags::COVERGROUP_EXPR;
    let mut ctx = EvalContext::new(&unit, request | EvalFlags::CACHE_RESULTS);
    {
        let guard = ctx.disable_caching();
        assert_eq!(guard.flags(), request);
    }
    ctx.reset();
    assert_eq!(ctx.flags(), request | EvalFlags::CACHE_RESULTS);
}

#[test]
fn reset_restores_the_fresh_state() {
    let (unit, f, x) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::CACHE_RESULTS);
    let root_local = ctx.create_local(x, int(1));
    assert!(ctx.push_frame(f, Span::DUMMY, LookupLocation::NONE));
    ctx.push_lvalue(LValue::new(root_local));
    ctx.step(Span::DUMMY);
    ctx.add_diag(ErrorCode::W6001, Span::DUMMY);
    ctx.set_disable_target(Some(unit.subroutine(f).block), Span::point(3));
    ctx.set_queue_target(Some(int(0)));

    ctx.reset();

    assert_eq!(ctx.depth(), 0);
    assert!(ctx.top_lvalue().is_none());
    assert_eq!(ctx.steps(), 0);
    assert!(ctx.diagnostics().is_empty());
    assert_eq!(ctx.disable_target(), None);
    assert_eq!(ctx.queue_target(), None);
    assert_eq!(ctx.find_local(x), None);
    assert_eq!(ctx.local(root_local), None);
    assert_eq!(ctx.flags(), EvalFlags::CACHE_RESULTS);
}

// Diagnostics

#[test]
fn add_diag_does_not_stop_and_has_errors_tracks_errors() {
    let (unit, _, _) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());
    ctx.add_diag(ErrorCode::W6001, Span::point(1));
    assert!(ctx.has_errors().is_none());

    ctx.add_diag(ErrorCode::E6006, Span::point(2))
        .set_message("assertion failed");
    assert!(ctx.has_errors().is_some());
    assert_eq!(ctx.diagnostics().len(), 2);
    assert_eq!(ctx.diagnostics().last().unwrap().severity, Severity::Error);
}

#[test]
fn add_diags_appends_copies() {
    let (unit, _, _) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());
    let mut other = Diagnostics::new();
    other.add(ErrorCode::E6007, Span::point(1));
    other.add(ErrorCode::E6008, Span::point(2));

    ctx.add_diags(&other);
    ctx.add_diags(&other);
    assert_eq!(ctx.diagnostics().len(), 4);
    assert_eq!(other.len(), 2);
}

#[test]
fn report_diags_drains_into_a_queue() {
    let (unit, _, _) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());
    ctx.add_diag(ErrorCode::E6007, Span::point(30));
    ctx.add_diag(ErrorCode::E6007, Span::point(30));
    ctx.add_diag(ErrorCode::W6001, Span::point(10));

    let mut queue = DiagnosticQueue::new();
    let accepted = ctx.report_diags(&mut queue);

    // The repeated error at the same spot is deduplicated.
    assert_eq!(accepted, 2);
    assert!(ctx.diagnostics().is_empty());
    let flushed = queue.flush();
    let codes: Vec<_> = flushed.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::W6001, ErrorCode::E6007]);
}

#[test]
fn report_stack_lists_calls_innermost_first() {
    let mut unit = CompilationUnit::new();
    let f = unit.declare_function("f", Span::new(0, 10));
    let n = unit.add_param(f, "n", Span::DUMMY);
    let g = unit.declare_function("g", Span::new(20, 30));
    let s = unit.add_param(g, "s", Span::DUMMY);
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());

    assert!(ctx.push_frame(f, Span::point(50), LookupLocation::NONE));
    ctx.create_local(n, int(3));
    ctx.push_empty_frame();
    assert!(ctx.push_frame(g, Span::point(60), LookupLocation::NONE));
    ctx.create_local(s, ConstantValue::string("hi"));

    let mut diag = Diagnostic::new(ErrorCode::E6006, Span::point(70));
    ctx.report_stack(&mut diag);

    assert_eq!(
        diag.notes,
        vec![
            Note::at("in call to 'g(\"hi\")'", Span::point(60)),
            Note::at("in call to 'f(3)'", Span::point(50)),
        ]
    );
}

#[test]
fn missing_arguments_render_as_question_marks() {
    let (unit, f, _) = unit_with_function();
    let mut ctx = EvalContext::new(&unit, EvalFlags::empty());
    assert!(ctx.push_frame(f, Span::point(4), LookupLocation::NONE));
    assert_eq!(ctx.dump_stack(), "in call to 'f(?)' (called from 4)");
}

#[test]
fn dump_stack_is_empty_at_top_level() {
    let (unit, _, _) = unit_with_function();
    let ctx = EvalContext::new(&unit, EvalFlags::empty());
    assert_eq!(ctx.dump_stack(), "");
}

#[test]
fn deep_stacks_elide_the_middle() {
    let (unit, f, x) = unit_with_function();
    let mut ctx = EvalContext::with_limits(&unit, EvalFlags::empty(), limits(64, 100, 4));
    for i in 0..10 {
        assert!(ctx.push_frame(f, Span::point(i), LookupLocation::NONE));
        ctx.create_local(x, int(i64::from(i)));
    }

    let mut diag = Diagnostic::new(ErrorCode::E6002, Span::DUMMY);
    ctx.report_stack(&mut diag);
    let messages: Vec<_> = diag.notes.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "in call to 'f(9)'",
            "in call to 'f(8)'",
            "skipping 6 frames",
            "in call to 'f(1)'",
            "in call to 'f(0)'",
        ]
    );
    assert_eq!(diag.notes[2].span, None);
}

#[test]
fn zero_backtrace_limit_shows_every_frame() {
    let (unit, f, _) = unit_with_function();
    let mut ctx = EvalContext::with_limits(&unit, EvalFlags::empty(), limits(64, 100, 0));
    for _ in 0..20 {
        assert!(ctx.push_frame(f, Span::DUMMY, LookupLocation::NONE));
    }
    assert_eq!(ctx.dump_stack().lines().count(), 20);
}

proptest! {
    #[test]
    fn balanced_pushes_and_pops_restore_depth(ops in prop::collection::vec(any::<bool>(), 0..64)) {
        let (unit, f, _) = unit_with_function();
        let mut ctx = EvalContext::with_limits(&unit, EvalFlags::empty(), limits(1000, 100, 10));
        let mut pushed = 0usize;
        for push in ops {
            if push {
                prop_assert!(ctx.push_frame(f, Span::DUMMY, LookupLocation::NONE));
                pushed += 1;
            } else if pushed > 0 {
                ctx.pop_frame();
                pushed -= 1;
            }
            prop_assert_eq!(ctx.depth(), pushed);
        }
        while pushed > 0 {
            ctx.pop_frame();
            pushed -= 1;
        }
        prop_assert!(!ctx.in_function());
    }

    #[test]
    fn step_counter_counts_every_call(max in 1u64..50, extra in 0u64..20) {
        let (unit, _, _) = unit_with_function();
        let mut ctx = EvalContext::with_limits(&unit, EvalFlags::empty(), limits(8, max, 10));
        for i in 1..=max {
            prop_assert!(ctx.step(Span::DUMMY));
            prop_assert_eq!(ctx.steps(), i);
        }
        for i in 1..=extra {
            prop_assert!(!ctx.step(Span::DUMMY));
            prop_assert_eq!(ctx.steps(), max + i);
        }
        prop_assert_eq!(ctx.diagnostics().len(), usize::try_from(extra).unwrap());
    }
}
