use super::*;
use crate::{tree, Policy, Tree};
use core::convert::Infallible;
use alloc::{format, string::ToString, vec, vec::Vec};
use core::cell::{Cell, RefCell};
use core::sync::atomic::{AtomicUsize, Ordering};

fn sum_pick(label: &&str) -> Policy {
    if *label == "+" {
        Policy::PushDown
    } else {
        Policy::Skip
    }
}
fn sum_fold(_: Tree<&'static str>, _: &mut SideOutput<&'static str>) -> Tree<&'static str> {
    Tree::leaf("3")
}

#[test]
fn push_down_sum() {
    assert_eq!(rewrite(tree!("+" => ["1", "2"]), sum_pick, sum_fold), Tree::leaf("3"));

    let fragments: Vec<_> = lazy_rewrite(tree!("+" => ["1", "2"]), sum_pick, sum_fold)
        .map(Result::unwrap)
        .collect();
    assert_eq!(
        fragments,
        vec![
            Fragment::Rewritten { depth: 1, tree: Tree::leaf("1") },
            Fragment::Rewritten { depth: 1, tree: Tree::leaf("2") },
            Fragment::Rewritten { depth: 0, tree: Tree::leaf("3") },
        ],
    );
}

#[test]
fn skip_is_identity() {
    let input = tree!("a" => [tree!("b" => ["c", "d"]), "e"]);
    let result = rewrite(
        input.clone(),
        |_| Policy::Skip,
        |_, _| panic!("transform called under the skip policy"),
    );
    assert_eq!(result, input);

    let mut lazy = lazy_rewrite(
        input.clone(),
        |_| Policy::Skip,
        |_, _| panic!("transform called under the skip policy"),
    );
    assert_eq!(lazy.pull(), Ok(Fragment::Rewritten { depth: 0, tree: input }));
    assert!(!lazy.has_more());
}

#[test]
fn pass_through_preserves_labels() {
    let input = tree!("a" => [tree!("b" => ["c", "d"]), "e"]);
    let result = rewrite(
        input.clone(),
        |_| Policy::PassThrough,
        |_, _| panic!("transform called under the pass-through policy"),
    );
    assert_eq!(result, input);

    // Every node is yielded once, children before their parents.
    let order: Vec<_> = lazy_rewrite(
        input.clone(),
        |_| Policy::PassThrough,
        |_, _| panic!("transform called under the pass-through policy"),
    )
    .map(|fragment| {
        let fragment = fragment.unwrap();
        (fragment.depth(), *fragment.tree().label())
    })
    .collect();
    assert_eq!(
        order,
        [(Some(2), "c"), (Some(2), "d"), (Some(1), "b"), (Some(1), "e"), (Some(0), "a")],
    );
}

#[test]
fn transform_does_not_descend() {
    let picks = Cell::new(0_usize);
    let result = rewrite(
        tree!("root" => ["left", "right"]),
        |_| {
            picks.set(picks.get() + 1);
            Policy::Transform
        },
        |node, _| {
            assert_eq!(node.child_count(), 2);
            Tree::leaf("replaced")
        },
    );
    assert_eq!(result, Tree::leaf("replaced"));
    assert_eq!(picks.get(), 1);
}

#[test]
fn repeat_transform_until_settled() {
    let calls = Cell::new(0_usize);
    let pick = |label: &i32| if *label < 3 { Policy::RepeatTransform } else { Policy::Skip };
    let transform = |node: Tree<i32>, _: &mut SideOutput<i32>| {
        calls.set(calls.get() + 1);
        Tree::leaf(node.label() + 1)
    };
    assert_eq!(rewrite(Tree::leaf(0), pick, transform), Tree::leaf(3));
    assert_eq!(calls.get(), 3);

    // Intermediate results of the loop are not yielded.
    let fragments: Vec<_> = lazy_rewrite(Tree::leaf(0), pick, transform)
        .map(Result::unwrap)
        .collect();
    assert_eq!(fragments, [Fragment::Rewritten { depth: 0, tree: Tree::leaf(3) }]);
    assert_eq!(calls.get(), 6);
}

#[test]
fn pull_up_descends_into_intermediate() {
    let pick = |label: &&str| match *label {
        "wrapper" => Policy::PullUp,
        "original" => panic!("the original children must not be visited"),
        _ => Policy::Skip,
    };
    let transform = |node: Tree<&'static str>, _: &mut SideOutput<&'static str>| {
        assert_eq!(*node.label(), "wrapper");
        tree!("unwrapped" => ["fresh"])
    };
    let input = tree!("wrapper" => ["original"]);

    assert_eq!(rewrite(input.clone(), pick, transform), tree!("unwrapped" => ["fresh"]));

    let fragments: Vec<_> = lazy_rewrite(input, pick, transform)
        .map(Result::unwrap)
        .collect();
    assert_eq!(
        fragments,
        [
            Fragment::Rewritten { depth: 1, tree: Tree::leaf("fresh") },
            Fragment::Rewritten { depth: 0, tree: tree!("unwrapped" => ["fresh"]) },
        ],
    );
}

#[test]
fn push_down_transforms_after_children() {
    let log = RefCell::new(Vec::new());
    let pick = |label: &char| if *label == 'r' { Policy::PushDown } else { Policy::Transform };
    let transform = |node: Tree<char>, _: &mut SideOutput<char>| {
        let label = *node.label();
        log.borrow_mut().push(label);
        if label == 'r' {
            assert_eq!(node.labels().copied().collect::<Vec<_>>(), ['r', 'A', 'B', 'C']);
            Tree::leaf('R')
        } else {
            Tree::leaf(label.to_ascii_uppercase())
        }
    };

    let result = rewrite(tree!('r' => ['a', 'b', 'c']), pick, transform);
    assert_eq!(result, Tree::leaf('R'));
    assert_eq!(log.replace(Vec::new()), ['a', 'b', 'c', 'r']);

    let fragments = lazy_rewrite(tree!('r' => ['a', 'b', 'c']), pick, transform)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(log.into_inner(), ['a', 'b', 'c', 'r']);
    assert_eq!(
        fragments,
        [
            Fragment::Rewritten { depth: 1, tree: Tree::leaf('A') },
            Fragment::Rewritten { depth: 1, tree: Tree::leaf('B') },
            Fragment::Rewritten { depth: 1, tree: Tree::leaf('C') },
            Fragment::Rewritten { depth: 0, tree: Tree::leaf('R') },
        ],
    );
}

#[test]
fn side_output_precedes_result() {
    let fragments: Vec<_> = lazy_rewrite(
        Tree::leaf("n"),
        |_| Policy::Transform,
        |_, side_output| {
            side_output.register([Tree::leaf("a"), Tree::leaf("b")]);
            Tree::leaf("r")
        },
    )
    .map(Result::unwrap)
    .collect();
    assert_eq!(
        fragments,
        [
            Fragment::Side(Tree::leaf("a")),
            Fragment::Side(Tree::leaf("b")),
            Fragment::Rewritten { depth: 0, tree: Tree::leaf("r") },
        ],
    );
}

#[test]
fn latest_registration_drains_first() {
    let lazy = lazy_rewrite(
        Tree::leaf("n"),
        |_| Policy::Transform,
        |_, side_output| {
            side_output.register([Tree::leaf("a")]);
            side_output.register(Vec::new());
            side_output.register([Tree::leaf("b"), Tree::leaf("c")]);
            assert_eq!(side_output.len(), 2);
            Tree::leaf("r")
        },
    );
    let (side_output, result) = lazy.collect_side_output().unwrap();
    assert_eq!(side_output, [Tree::leaf("b"), Tree::leaf("c"), Tree::leaf("a")]);
    assert_eq!(result, Tree::leaf("r"));
}

#[test]
fn side_output_of_children_precedes_parent() {
    let pick = |label: &&str| if *label == "p" { Policy::PushDown } else { Policy::Transform };
    let transform = |node: Tree<&'static str>, side_output: &mut SideOutput<&'static str>| {
        side_output.register([Tree::leaf(match *node.label() {
            "x" => "x-side",
            "y" => "y-side",
            _ => "p-side",
        })]);
        node
    };
    let input = tree!("p" => ["x", "y"]);

    let fragments: Vec<_> = lazy_rewrite(input.clone(), pick, transform)
        .map(Result::unwrap)
        .collect();
    assert_eq!(
        fragments,
        [
            Fragment::Side(Tree::leaf("x-side")),
            Fragment::Rewritten { depth: 1, tree: Tree::leaf("x") },
            Fragment::Side(Tree::leaf("y-side")),
            Fragment::Rewritten { depth: 1, tree: Tree::leaf("y") },
            Fragment::Side(Tree::leaf("p-side")),
            Fragment::Rewritten { depth: 0, tree: input.clone() },
        ],
    );
    // The eager rewriter computes the same result and drops the side output.
    assert_eq!(rewrite(input.clone(), pick, transform), input);
}

#[test]
fn exhaustion() {
    let mut lazy = lazy_rewrite(Tree::leaf(1), |_| Policy::Skip, |node, _| node);
    assert!(lazy.has_more());
    assert_eq!(lazy.pull(), Ok(Fragment::Rewritten { depth: 0, tree: Tree::leaf(1) }));
    assert!(!lazy.has_more());
    assert_eq!(lazy.pull(), Err(RewriteError::Exhausted));
    assert_eq!(lazy.pull(), Err(RewriteError::Exhausted));
    assert_eq!(lazy.next(), None);
    assert_eq!(lazy.fragments_emitted(), 1);
}

#[test]
fn finish_after_drain_is_exhausted() {
    let mut lazy = lazy_rewrite(tree!(1 => [2]), |_| Policy::PassThrough, |node, _| node);
    assert_eq!(lazy.pull().map(|fragment| fragment.is_root_result()), Ok(false));
    assert_eq!(lazy.pull().map(|fragment| fragment.is_root_result()), Ok(true));
    assert_eq!(lazy.finish(), Err(RewriteError::Exhausted));
}

#[test]
fn repeat_limit() {
    let calls = Cell::new(0_usize);
    let config = RewriteConfig::new().with_repeat_limit(5);
    let rules = FnRules::new(
        |_: &u32| Policy::RepeatTransform,
        |node: Tree<u32>, _: &mut SideOutput<u32>| {
            calls.set(calls.get() + 1);
            node
        },
    );

    let mut rewriter = Rewriter::new(rules).with_config(config);
    assert_eq!(
        rewriter.rewrite(Tree::leaf(0)),
        Err(RewriteError::RepeatLimitExceeded { limit: 5 }),
    );
    assert_eq!(calls.get(), 5);

    let mut lazy = rewriter.lazy(Tree::leaf(0));
    assert_eq!(lazy.pull(), Err(RewriteError::RepeatLimitExceeded { limit: 5 }));
    assert!(!lazy.has_more());
    assert_eq!(lazy.pull(), Err(RewriteError::Exhausted));
    assert_eq!(calls.get(), 10);
}

#[test]
fn depth_limit() {
    let chain = tree!("a" => [tree!("b" => [tree!("c" => ["d"])])]);
    let rules = FnRules::new(
        |_: &&str| Policy::PassThrough,
        |node: Tree<&'static str>, _: &mut SideOutput<&'static str>| node,
    );

    let mut shallow = Rewriter::new(rules).with_config(RewriteConfig::new().with_depth_limit(2));
    assert_eq!(
        shallow.rewrite(chain.clone()),
        Err(RewriteError::DepthLimitExceeded { limit: 2 }),
    );
    assert_eq!(
        shallow.lazy(chain.clone()).next(),
        Some(Err(RewriteError::DepthLimitExceeded { limit: 2 })),
    );

    let mut deep = Rewriter::new(rules).with_config(RewriteConfig::new().with_depth_limit(3));
    assert_eq!(deep.rewrite(chain.clone()), Ok(chain.clone()));
    assert_eq!(deep.lazy(chain.clone()).finish(), Ok(chain));
}

#[test]
fn rule_errors_propagate() {
    let pick = |label: &&str| match *label {
        "bad" => Err("no policy for this label"),
        "ok" => Ok(Policy::PassThrough),
        _ => Ok(Policy::Skip),
    };
    let transform = |node: Tree<&'static str>, _: &mut SideOutput<&'static str>| -> Result<_, &'static str> {
        Ok(node)
    };
    let input = tree!("ok" => ["fine", "bad"]);

    assert_eq!(
        try_rewrite(input.clone(), pick, transform),
        Err(RewriteError::Rule("no policy for this label")),
    );

    let mut lazy = try_lazy_rewrite(input, pick, transform);
    assert_eq!(lazy.next(), Some(Ok(Fragment::Rewritten { depth: 1, tree: Tree::leaf("fine") })));
    assert_eq!(lazy.next(), Some(Err(RewriteError::Rule("no policy for this label"))));
    assert!(!lazy.has_more());
    assert_eq!(lazy.next(), None);
}

#[test]
fn nested_rewrite_in_transform() {
    let result = rewrite(
        tree!("outer" => ["x", "y"]),
        |_| Policy::Transform,
        |node, _| {
            rewrite(
                node,
                |label| if *label == "outer" { Policy::PassThrough } else { Policy::Transform },
                |_, _| Tree::leaf("inner"),
            )
        },
    );
    assert_eq!(result, tree!("outer" => ["inner", "inner"]));
}

struct Increment {
    calls: usize,
}
impl Rules<u32> for Increment {
    type Error = Infallible;
    fn pick(&mut self, _: &u32) -> Result<Policy, Self::Error> {
        Ok(Policy::PushDown)
    }
    fn transform(
        &mut self,
        mut tree: Tree<u32>,
        _: &mut SideOutput<u32>,
    ) -> Result<Tree<u32>, Self::Error> {
        self.calls += 1;
        *tree.label_mut() += 1;
        Ok(tree)
    }
}

#[test]
fn rules_reused_through_mutable_reference() {
    let mut rules = Increment { calls: 0 };
    let once = Rewriter::new(&mut rules).rewrite(tree!(0_u32 => [1, 2])).unwrap();
    assert_eq!(once, tree!(1 => [2, 3]));
    let twice = Rewriter::new(&mut rules).lazy(once).finish().unwrap();
    assert_eq!(twice, tree!(2 => [3, 4]));
    assert_eq!(rules.calls, 6);
}

#[test]
fn fragment_accessors() {
    let side = Fragment::Side(Tree::leaf('s'));
    assert!(side.is_side_output());
    assert!(!side.is_root_result());
    assert_eq!(side.depth(), None);

    let child = Fragment::Rewritten { depth: 2, tree: Tree::leaf('c') };
    assert!(!child.is_side_output());
    assert!(!child.is_root_result());
    assert_eq!(child.depth(), Some(2));
    assert_eq!(child.tree(), &Tree::leaf('c'));
    assert_eq!(child.into_tree(), Tree::leaf('c'));
}

#[test]
fn error_messages() {
    let error = RewriteError::<Infallible>::RepeatLimitExceeded { limit: 3 };
    assert_eq!(
        error.to_string(),
        "a node was transformed more than 3 times in a row under the repeat-transform policy",
    );
    let widened: RewriteError<&str> = error.widen();
    assert_eq!(widened, RewriteError::RepeatLimitExceeded { limit: 3 });
    assert_eq!(widened.into_rule_error(), None);

    let rule = RewriteError::Rule("boom");
    assert_eq!(rule.to_string(), format!("a rewrite rule failed: {}", "boom"));
    assert_eq!(rule.into_rule_error(), Some("boom"));
}

#[test]
fn deep_skipped_child_is_yielded() {
    const LEN: usize = 200_000;
    let mut chain = Tree::leaf(0_usize);
    for label in 1..LEN {
        chain = Tree::with_children(label, [chain]);
    }
    let mut lazy = lazy_rewrite(
        Tree::with_children(usize::MAX, [chain]),
        |label| if *label == usize::MAX { Policy::PassThrough } else { Policy::Skip },
        |_, _| unreachable!(),
    );

    let child = lazy.pull().unwrap();
    assert_eq!(child.depth(), Some(1));
    assert_eq!(child.tree().node_count(), LEN);
    drop(child);

    let root = lazy.pull().unwrap();
    assert!(root.is_root_result());
    assert_eq!(root.tree().node_count(), LEN + 1);
    assert!(!lazy.has_more());
}

static LABEL_CLONES: AtomicUsize = AtomicUsize::new(0);

/// A label which counts how many times it has been cloned.
#[derive(Debug, PartialEq, Eq)]
struct Counted(usize);
impl Clone for Counted {
    fn clone(&self) -> Self {
        LABEL_CLONES.fetch_add(1, Ordering::Relaxed);
        Self(self.0)
    }
}

#[test]
fn finish_moves_children_instead_of_cloning() {
    const LEN: usize = 50;
    let chain = || {
        let mut node = Tree::leaf(Counted(0));
        for label in 1..LEN {
            node = Tree::with_children(Counted(label), [node]);
        }
        node
    };

    LABEL_CLONES.store(0, Ordering::Relaxed);
    let finished = lazy_rewrite(chain(), |_| Policy::PassThrough, |_, _| unreachable!())
        .finish()
        .unwrap();
    assert_eq!(LABEL_CLONES.load(Ordering::Relaxed), 0);
    assert_eq!(finished.node_count(), LEN);

    let (side_output, collected) =
        lazy_rewrite(chain(), |_| Policy::PassThrough, |_, _| unreachable!())
            .collect_side_output()
            .unwrap();
    assert_eq!(LABEL_CLONES.load(Ordering::Relaxed), 0);
    assert!(side_output.is_empty());
    assert_eq!(collected.node_count(), LEN);

    // Every fragment below the root is a copy of a subtree of the chain.
    let fragments = lazy_rewrite(chain(), |_| Policy::PassThrough, |_, _| unreachable!()).count();
    assert_eq!(fragments, LEN);
    assert_eq!(LABEL_CLONES.load(Ordering::Relaxed), LEN * (LEN - 1) / 2);
}
