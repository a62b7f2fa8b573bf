//! CPLEX LP-format serialization.
//!
//! The textual model dump written when `save_model` is enabled. The format
//! is the conventional one: `Minimize` / `Subject To` / `Bounds` /
//! `Binaries` / `End` sections, one constraint per row.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use crate::model::{LinearModel, Relation, VarKind};

impl LinearModel {
    /// Renders the model as an LP-format document.
    pub fn to_lp_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\\ Model: {}", self.name());

        out.push_str("Minimize\n obj:");
        let objective_terms: Vec<(usize, f64)> = self
            .variables()
            .iter()
            .enumerate()
            .filter(|(_, v)| v.objective() != 0.0)
            .map(|(idx, v)| (idx, v.objective()))
            .collect();
        if objective_terms.is_empty() {
            out.push_str(" 0");
        } else {
            for (position, (idx, coefficient)) in objective_terms.iter().enumerate() {
                push_term(
                    &mut out,
                    position == 0,
                    *coefficient,
                    self.variables()[*idx].name(),
                );
            }
        }
        out.push('\n');

        out.push_str("Subject To\n");
        for constraint in self.constraints() {
            let _ = write!(out, " {}:", constraint.name());
            for (position, (var, coefficient)) in constraint.terms().iter().enumerate() {
                push_term(&mut out, position == 0, *coefficient, self.variable(*var).name());
            }
            let relation = match constraint.relation() {
                Relation::Equal => "=",
                Relation::LessOrEqual => "<=",
                Relation::GreaterOrEqual => ">=",
            };
            let _ = writeln!(out, " {} {}", relation, constraint.rhs());
        }

        let continuous: Vec<_> = self
            .variables()
            .iter()
            .filter_map(|v| match v.kind() {
                VarKind::Continuous { lower, upper } => Some((v.name(), lower, upper)),
                VarKind::Binary => None,
            })
            .collect();
        if !continuous.is_empty() {
            out.push_str("Bounds\n");
            for (name, lower, upper) in continuous {
                let _ = writeln!(out, " {} <= {} <= {}", lower, name, upper);
            }
        }

        let binaries: Vec<_> = self
            .variables()
            .iter()
            .filter(|v| matches!(v.kind(), VarKind::Binary))
            .map(|v| v.name())
            .collect();
        if !binaries.is_empty() {
            out.push_str("Binaries\n");
            for name in binaries {
                let _ = writeln!(out, " {}", name);
            }
        }

        out.push_str("End\n");
        out
    }

    /// Writes the LP-format document to a file.
    pub fn write_lp_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, self.to_lp_string())
    }
}

// Appends one "± coefficient name" term. The leading term carries its sign
// only when negative; later terms are joined with " + " or " - ".
fn push_term(out: &mut String, first: bool, coefficient: f64, name: &str) {
    let magnitude = coefficient.abs();
    if first {
        if coefficient < 0.0 {
            out.push_str(" -");
        }
    } else if coefficient < 0.0 {
        out.push_str(" -");
    } else {
        out.push_str(" +");
    }
    if magnitude == 1.0 {
        let _ = write!(out, " {}", name);
    } else {
        let _ = write!(out, " {} {}", magnitude, name);
    }
}
