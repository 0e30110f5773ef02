//! ASCII rendering of circuits.
//!
//! Each qubit gets one wire. Instructions are packed into columns as early as
//! their operands allow; barriers always start a fresh column across every
//! wire. The classical register is drawn as a single double-line wire below.

use std::fmt;

use crate::circuit::Circuit;
use crate::instruction::{Instruction, InstructionKind};

const WIRE: char = '─';
const CLASSICAL_WIRE: char = '═';
const BARRIER: &str = "░";
const MEASURE: &str = "M";
const CONTROL: &str = "■";
const CROSSING: &str = "┼";

/// A rendered text diagram of a circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitDiagram {
    lines: Vec<String>,
}

impl CircuitDiagram {
    /// Render a circuit.
    pub fn render(circuit: &Circuit) -> Self {
        let num_qubits = circuit.num_qubits();
        let mut columns: Vec<Vec<Option<&'static str>>> = vec![];
        let mut next_free = vec![0usize; num_qubits];

        for inst in circuit.instructions() {
            if inst.qubits.is_empty() {
                continue;
            }
            let span = span_of(inst);
            let col = if inst.is_barrier() {
                next_free.iter().copied().max().unwrap_or(0)
            } else {
                span.clone().map(|q| next_free[q]).max().unwrap_or(0)
            };
            while columns.len() <= col {
                columns.push(vec![None; num_qubits]);
            }
            place(&mut columns[col], inst);

            if inst.is_barrier() {
                next_free.iter_mut().for_each(|n| *n = col + 1);
            } else {
                for q in span {
                    next_free[q] = col + 1;
                }
            }
        }

        let labels: Vec<String> = circuit.qubits().iter().map(|q| format!("{q}: ")).collect();
        let creg_label = creg_label(circuit);
        let margin = labels
            .iter()
            .map(|l| l.chars().count())
            .chain(creg_label.iter().map(|l| l.chars().count()))
            .max()
            .unwrap_or(0);

        let widths: Vec<usize> = columns
            .iter()
            .map(|col| {
                col.iter()
                    .flatten()
                    .map(|s| s.chars().count())
                    .max()
                    .unwrap_or(1)
            })
            .collect();

        let mut lines = Vec::with_capacity(num_qubits + 1);
        for (q, label) in labels.iter().enumerate() {
            let mut line = format!("{label:>margin$}");
            line.push(WIRE);
            for (col, width) in columns.iter().zip(&widths) {
                line.push_str(&cell(col[q], *width));
                line.push(WIRE);
            }
            lines.push(line);
        }

        if let Some(label) = creg_label {
            let body: usize = widths.iter().map(|w| w + 1).sum::<usize>() + 1;
            let mut line = format!("{label:>margin$}");
            line.extend(std::iter::repeat_n(CLASSICAL_WIRE, body));
            lines.push(line);
        }

        Self { lines }
    }

    /// The rendered lines, top wire first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for CircuitDiagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Wire indices covered by an instruction, inclusive of crossed wires.
fn span_of(inst: &Instruction) -> std::ops::RangeInclusive<usize> {
    let lo = inst.qubits.iter().map(|q| q.0 as usize).min().unwrap_or(0);
    let hi = inst.qubits.iter().map(|q| q.0 as usize).max().unwrap_or(0);
    lo..=hi
}

fn place(column: &mut [Option<&'static str>], inst: &Instruction) {
    match &inst.kind {
        InstructionKind::Gate(gate) if inst.qubits.len() > 1 => {
            for q in span_of(inst) {
                column[q] = Some(CROSSING);
            }
            let Some((target, controls)) = inst.qubits.split_last() else {
                return;
            };
            for c in controls {
                column[c.0 as usize] = Some(CONTROL);
            }
            column[target.0 as usize] = Some(gate.label());
        }
        InstructionKind::Gate(gate) => column[inst.qubits[0].0 as usize] = Some(gate.label()),
        InstructionKind::Measure => {
            for q in &inst.qubits {
                column[q.0 as usize] = Some(MEASURE);
            }
        }
        InstructionKind::Barrier => {
            for q in &inst.qubits {
                column[q.0 as usize] = Some(BARRIER);
            }
        }
    }
}

fn cell(content: Option<&str>, width: usize) -> String {
    match content {
        Some(text) => {
            let pad = width - text.chars().count();
            let left = pad / 2;
            let mut s = String::with_capacity(width * 3);
            s.extend(std::iter::repeat_n(WIRE, left));
            s.push_str(text);
            s.extend(std::iter::repeat_n(WIRE, pad - left));
            s
        }
        None => std::iter::repeat_n(WIRE, width).collect(),
    }
}

fn creg_label(circuit: &Circuit) -> Option<String> {
    let first = circuit.clbits().first()?;
    let name = first.register.as_deref().unwrap_or("c");
    Some(format!("{name}: {}/", circuit.num_clbits()))
}
