use std::ops::Range;

use crate::error::ConfigError;
use crate::geometry::VertexAttribute;

/// One program drawing one contiguous vertex range of the shared geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    /// Index into the frame's program list.
    pub program: usize,
    pub vertices: Range<u32>,
}

impl Pairing {
    pub fn new(program: usize, vertices: Range<u32>) -> Self {
        Self { program, vertices }
    }

    /// Checks the pairing against the scene it will draw from.
    ///
    /// `index` is the pairing's position, used in error messages.
    pub fn validate(&self, index: usize, program_count: usize, vertex_count: u32) -> Result<(), ConfigError> {
        if self.program >= program_count {
            return Err(ConfigError::UnknownProgram {
                index,
                program: self.program,
                count: program_count,
            });
        }

        let Range { start, end } = self.vertices;
        if start >= end || end > vertex_count {
            return Err(ConfigError::VertexRange {
                index,
                start,
                end,
                vertex_count,
            });
        }

        let count = end - start;
        if count % 3 != 0 {
            return Err(ConfigError::PartialTriangle { index, count });
        }

        Ok(())
    }
}

/// A single command in a frame's draw sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawStep {
    /// Make the program current (pipeline + its MVP bind group).
    UseProgram(usize),

    /// Bind the geometry's buffer for `attribute` to the attribute's slot.
    BindAttribute(VertexAttribute),

    /// Triangle-list draw over exactly these vertices.
    Draw(Range<u32>),
}

/// Fixed, validated draw sequence for every frame.
///
/// Pairings run in registration order. Each pairing makes its own program
/// current and rebinds every attribute slot that program reads, so nothing
/// bound by an earlier pairing is relied on by a later one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawPlan {
    steps: Vec<DrawStep>,
    programs: Vec<usize>,
}

impl DrawPlan {
    /// Builds the plan.
    ///
    /// `program_attributes[i]` lists the attributes program `i` reads;
    /// `has_colors` says whether the geometry carries a color stream.
    pub fn build(
        pairings: &[Pairing],
        program_attributes: &[&[VertexAttribute]],
        vertex_count: u32,
        has_colors: bool,
    ) -> Result<Self, ConfigError> {
        let mut steps = Vec::with_capacity(pairings.len() * 4);
        let mut programs = Vec::new();

        for (index, pairing) in pairings.iter().enumerate() {
            pairing.validate(index, program_attributes.len(), vertex_count)?;

            let attributes = program_attributes[pairing.program];
            if attributes.contains(&VertexAttribute::Color) && !has_colors {
                return Err(ConfigError::MissingColors {
                    program: pairing.program,
                });
            }

            if !programs.contains(&pairing.program) {
                programs.push(pairing.program);
            }

            steps.push(DrawStep::UseProgram(pairing.program));
            steps.extend(attributes.iter().copied().map(DrawStep::BindAttribute));
            steps.push(DrawStep::Draw(pairing.vertices.clone()));
        }

        Ok(Self { steps, programs })
    }

    pub fn steps(&self) -> &[DrawStep] {
        &self.steps
    }

    /// Programs used by the plan, in first-use order. Each receives the MVP
    /// before the frame's draws are recorded.
    pub fn programs(&self) -> &[usize] {
        &self.programs
    }

    pub fn draw_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, DrawStep::Draw(_)))
            .count()
    }
}
