//! Annotated source fixtures.
//!
//! Completion requests are easiest to describe as source text with `^`
//! markers where the cursor goes:
//!
//! ```
//! use semcc::base::Annotated;
//!
//! let fixture = Annotated::parse("x = ^10; y = ^20;");
//! assert_eq!(fixture.code, "x = 10; y = 20;");
//! assert_eq!(fixture.points, vec![4, 12]);
//! ```

/// Source text with the `^` cursor markers removed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotated {
    /// The code without markers.
    pub code: String,
    /// Byte offsets into `code`, one per marker, in order of appearance.
    pub points: Vec<usize>,
}

impl Annotated {
    /// Strip every `^` from `annotated`, remembering where each one was.
    pub fn parse(annotated: &str) -> Self {
        let mut code = String::with_capacity(annotated.len());
        let mut points = Vec::new();

        let mut rest = annotated;
        while let Some(next) = rest.find('^') {
            code.push_str(&rest[..next]);
            points.push(code.len());
            rest = &rest[next + 1..];
        }
        code.push_str(rest);

        Self { code, points }
    }

    /// The single marker of a fixture that is expected to have exactly one.
    pub fn point(&self) -> Option<usize> {
        match self.points.as_slice() {
            [point] => Some(*point),
            _ => None,
        }
    }
}
