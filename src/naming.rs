use crate::error::SplitError;
use crate::page_range::PageRange;
use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_NAME_TEMPLATE: &str = "Document_{i}_pages_{start}_to_{end}.pdf";

/// Widest padding a placeholder may ask for.
pub const MAX_FIELD_WIDTH: usize = 32;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_]*)(?::(0?)([0-9]+))?\}").expect("placeholder pattern is valid")
});

/// Output file name pattern with `{i}`, `{start}` and `{end}` placeholders.
///
/// A placeholder may carry a width, e.g. `{i:03}` renders chunk 7 as `007`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field {
        field: Field,
        width: usize,
        zero_pad: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Index,
    Start,
    End,
}

impl NameTemplate {
    pub fn parse(template: &str) -> Result<Self, SplitError> {
        if template.trim().is_empty() {
            return Err(SplitError::Config("name template is empty".into()));
        }

        let mut segments = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(template) {
            let whole = caps.get(0).expect("group 0 always matches");
            push_literal(&mut segments, &template[last..whole.start()], template)?;

            let field = match &caps[1] {
                "i" => Field::Index,
                "start" => Field::Start,
                "end" => Field::End,
                other => {
                    return Err(SplitError::Config(format!(
                        "unknown placeholder '{{{}}}' in name template '{}'",
                        other, template
                    )))
                }
            };
            let zero_pad = caps.get(2).is_some_and(|m| !m.as_str().is_empty());
            let width = match caps.get(3) {
                Some(m) => m.as_str().parse::<usize>().map_err(|_| {
                    SplitError::Config(format!("bad width in name template '{}'", template))
                })?,
                None => 0,
            };
            if width > MAX_FIELD_WIDTH {
                return Err(SplitError::Config(format!(
                    "width {} in name template '{}' exceeds {}",
                    width, template, MAX_FIELD_WIDTH
                )));
            }

            segments.push(Segment::Field {
                field,
                width,
                zero_pad,
            });
            last = whole.end();
        }
        push_literal(&mut segments, &template[last..], template)?;

        Ok(NameTemplate { segments })
    }

    /// Render the file name for the `index`-th chunk (1-based) covering `range`.
    pub fn render(&self, index: usize, range: PageRange) -> Result<String, SplitError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field {
                    field,
                    width,
                    zero_pad,
                } => {
                    let value = match field {
                        Field::Index => index as u64,
                        Field::Start => range.start as u64,
                        Field::End => range.end as u64,
                    };
                    if *zero_pad {
                        out.push_str(&format!("{:0width$}", value, width = *width));
                    } else {
                        out.push_str(&format!("{:width$}", value, width = *width));
                    }
                }
            }
        }
        check_file_name(&out)?;
        Ok(out)
    }
}

fn push_literal(segments: &mut Vec<Segment>, text: &str, template: &str) -> Result<(), SplitError> {
    if text.contains('{') || text.contains('}') {
        return Err(SplitError::Config(format!(
            "unbalanced or malformed braces in name template '{}'",
            template
        )));
    }
    if !text.is_empty() {
        segments.push(Segment::Literal(text.to_string()));
    }
    Ok(())
}

/// Output names are plain file names inside the output directory.
pub fn check_file_name(name: &str) -> Result<(), SplitError> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(SplitError::Config(format!("'{}' is not a file name", name)));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(SplitError::Config(format!(
            "output name '{}' must not contain path separators",
            name
        )));
    }
    Ok(())
}
