//! Line diffs between serialized values, used to make structural equality
//! failures readable without re-running the suite.

use colored::*;
use difference::{Changeset, Difference};

/// Render a line diff from the expected string to the actual one. Added
/// lines are the ones only the actual value has, removed lines the ones only
/// the expected value has.
pub fn gen_diff(expected: &str, actual: &str) -> String {
    let changes = Changeset::new(expected, actual, "\n");
    let mut buf = String::new();

    for diff in &changes.diffs {
        match diff {
            Difference::Same(block) => {
                for line in block.split('\n') {
                    buf.push_str(&format!(" {}\n", line.trim_end().dimmed()));
                }
            }
            Difference::Add(block) => {
                for line in block.split('\n') {
                    buf.push_str(&format!(
                        "{}{}\n",
                        "+".green(),
                        line.trim_end().green()
                    ));
                }
            }
            Difference::Rem(block) => {
                for line in block.split('\n') {
                    buf.push_str(&format!(
                        "{}{}\n",
                        "-".red(),
                        line.trim_end().red()
                    ));
                }
            }
        }
    }

    buf.trim_end().to_string()
}
