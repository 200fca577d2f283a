// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Myers O(N·D) diff. Paper: <http://www.xmailserver.org/diff2.pdf>.
//!
//! ```text
//! old: [Home, TabA]          new: [Home, TabB]
//!
//!  common prefix ─► Retain(Home)
//!  middle       ─► Myers([TabA], [TabB]) = Remove(TabA), Insert(TabB)
//!  common suffix ─► (none)
//! ```
//!
//! Rules for choosing among scripts of equal (minimal) length:
//! 1. The longest common prefix is always retained.
//! 2. Within a run of edits between two retained elements, removals come before
//!    insertions.

use crate::{DEBUG_NAV_DIFF, EditOp, EditScript};

/// Minimal edit script from `old` to `new`, comparing elements with `==`. Pure.
///
/// ```
/// use r3bl_navigator::{EditOp, diff};
///
/// let script = diff(&["home", "tab_a"], &["home", "tab_b"]);
/// assert_eq!(
///     script.ops,
///     vec![
///         EditOp::Retain { old_index: 0, new_index: 0 },
///         EditOp::Remove { old_index: 1 },
///         EditOp::Insert { new_index: 1 },
///     ]
/// );
/// ```
#[must_use]
pub fn diff<T: PartialEq>(old: &[T], new: &[T]) -> EditScript {
    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let old_rest = &old[prefix..];
    let new_rest = &new[prefix..];

    let suffix = old_rest
        .iter()
        .rev()
        .zip(new_rest.iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old_rest[..old_rest.len() - suffix];
    let new_mid = &new_rest[..new_rest.len() - suffix];

    let mut ops: Vec<EditOp> = Vec::with_capacity(old.len().max(new.len()));

    ops.extend((0..prefix).map(|index| EditOp::Retain {
        old_index: index,
        new_index: index,
    }));

    ops.extend(myers(old_mid, new_mid).into_iter().map(|op| match op {
        EditOp::Retain {
            old_index,
            new_index,
        } => EditOp::Retain {
            old_index: old_index + prefix,
            new_index: new_index + prefix,
        },
        EditOp::Insert { new_index } => EditOp::Insert {
            new_index: new_index + prefix,
        },
        EditOp::Remove { old_index } => EditOp::Remove {
            old_index: old_index + prefix,
        },
    }));

    let old_suffix_start = prefix + old_mid.len();
    let new_suffix_start = prefix + new_mid.len();
    ops.extend((0..suffix).map(|index| EditOp::Retain {
        old_index: old_suffix_start + index,
        new_index: new_suffix_start + index,
    }));

    let script = EditScript {
        ops: removals_first(ops),
    };

    DEBUG_NAV_DIFF.then(|| {
        tracing::debug!(
            message = "diff",
            old_len = old.len(),
            new_len = new.len(),
            prefix,
            suffix,
            edit_distance = script.edit_distance()
        );
    });

    script
}

/// Greedy forward pass that records `V` for every `D`, then backtracks through the
/// recorded frontiers. Indices in the returned ops are relative to `a` and `b`.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn myers<T: PartialEq>(a: &[T], b: &[T]) -> Vec<EditOp> {
    let n = a.len();
    let m = b.len();

    if n == 0 {
        return (0..m).map(|new_index| EditOp::Insert { new_index }).collect();
    }
    if m == 0 {
        return (0..n).map(|old_index| EditOp::Remove { old_index }).collect();
    }

    let max = (n + m) as isize;
    let offset = max;
    let index_of = |k: isize| (k + offset) as usize;

    // v[k] holds the furthest x reached on diagonal k = x - y.
    let mut v: Vec<isize> = vec![0; 2 * (n + m) + 2];
    let mut trace: Vec<Vec<isize>> = vec![];

    'outer: for d in 0..=max {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            // Moving down (insertion) from k + 1, or right (removal) from k - 1.
            let mut x = if k == -d || (k != d && v[index_of(k - 1)] < v[index_of(k + 1)]) {
                v[index_of(k + 1)]
            } else {
                v[index_of(k - 1)] + 1
            };
            let mut y = x - k;
            while (x as usize) < n && (y as usize) < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            v[index_of(k)] = x;
            if x as usize >= n && y as usize >= m {
                break 'outer;
            }
            k += 2;
        }
    }

    let mut ops = vec![];
    let mut x = n as isize;
    let mut y = m as isize;

    for (d, v) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;
        let prev_k = if k == -d || (k != d && v[index_of(k - 1)] < v[index_of(k + 1)]) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = v[index_of(prev_k)];
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            ops.push(EditOp::Retain {
                old_index: (x - 1) as usize,
                new_index: (y - 1) as usize,
            });
            x -= 1;
            y -= 1;
        }

        if d > 0 {
            if x == prev_x {
                ops.push(EditOp::Insert {
                    new_index: (y - 1) as usize,
                });
            } else {
                ops.push(EditOp::Remove {
                    old_index: (x - 1) as usize,
                });
            }
        }

        x = prev_x;
        y = prev_y;
    }

    ops.reverse();
    ops
}

/// Within each run of consecutive non retain ops, move removals ahead of insertions.
/// Indices are absolute, so this does not change what the script produces.
fn removals_first(ops: Vec<EditOp>) -> Vec<EditOp> {
    let mut result = Vec::with_capacity(ops.len());
    let mut removes = vec![];
    let mut inserts = vec![];

    for op in ops {
        match op {
            EditOp::Remove { .. } => removes.push(op),
            EditOp::Insert { .. } => inserts.push(op),
            EditOp::Retain { .. } => {
                result.append(&mut removes);
                result.append(&mut inserts);
                result.push(op);
            }
        }
    }
    result.append(&mut removes);
    result.append(&mut inserts);
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::{Destination, EditItem};

    /// Edit distance (inserts + removes only) via the LCS table.
    fn reference_distance(a: &[char], b: &[char]) -> usize {
        let mut table = vec![vec![0_usize; b.len() + 1]; a.len() + 1];
        for i in 1..=a.len() {
            for j in 1..=b.len() {
                table[i][j] = if a[i - 1] == b[j - 1] {
                    table[i - 1][j - 1] + 1
                } else {
                    table[i - 1][j].max(table[i][j - 1])
                };
            }
        }
        a.len() + b.len() - 2 * table[a.len()][b.len()]
    }

    #[test_case("", ""; "both empty")]
    #[test_case("", "abc"; "insert everything")]
    #[test_case("abc", ""; "remove everything")]
    #[test_case("abc", "abc"; "identical")]
    #[test_case("abcabba", "cbabac"; "myers paper example")]
    #[test_case("ab", "ba"; "swap")]
    #[test_case("abcd", "acbd"; "inner swap")]
    #[test_case("hxy", "hz"; "tab switch")]
    #[test_case("abcdef", "abxdef"; "single replacement in middle")]
    #[test_case("aaaa", "aa"; "repeated elements")]
    #[test_case("xaxbxc", "abc"; "interleaved removals")]
    fn test_script_is_minimal_and_applies(old: &str, new: &str) {
        let old: Vec<char> = old.chars().collect();
        let new: Vec<char> = new.chars().collect();

        let script = diff(&old, &new);

        assert_eq!(script.apply(&old, &new), new);
        assert_eq!(script.edit_distance(), reference_distance(&old, &new));
        assert_eq!(script.has_changes(), old != new);
    }

    #[test]
    fn test_longest_common_prefix_is_retained() {
        // "aXa" -> "a": either 'a' could be retained, the prefix one must be.
        let script = diff(&['a', 'x', 'a'], &['a']);
        assert_eq!(
            script.ops,
            vec![
                EditOp::Retain {
                    old_index: 0,
                    new_index: 0
                },
                EditOp::Remove { old_index: 1 },
                EditOp::Remove { old_index: 2 },
            ]
        );
    }

    #[test]
    fn test_removals_come_before_insertions() {
        let script = diff(&['a', 'b', 'c', 'z'], &['a', 'x', 'y', 'z']);
        let kinds: Vec<&str> = script
            .ops
            .iter()
            .map(|op| match op {
                EditOp::Retain { .. } => "=",
                EditOp::Insert { .. } => "+",
                EditOp::Remove { .. } => "-",
            })
            .collect();
        assert_eq!(kinds, vec!["=", "-", "-", "+", "+", "="]);
    }

    #[test]
    fn test_retained_elements_keep_their_identity() {
        let old = vec![
            Destination::new("home"),
            Destination::new("list"),
            Destination::new("detail"),
        ];
        let new = vec![
            Destination::new("home"),
            Destination::new("detail"),
            Destination::new("share"),
        ];

        let script = diff(&old, &new);
        let result = script.apply(&old, &new);

        assert_eq!(result, new);
        assert!(result[0].same_instance(&old[0]));
        assert!(result[1].same_instance(&old[2]));
        assert!(result[2].same_instance(&new[2]));

        let items = script.items(&old, &new);
        assert!(matches!(items[1], EditItem::Remove(it) if it.id().name() == "list"));
    }
}
