//! Match patterns.
//!
//! Patterns are small owned trees; they are never shared between arms, so
//! there is nothing to gain from arena-allocating them.

use crate::{Name, Span};

use super::StmtRange;

/// One `pattern => body` arm.
#[derive(Clone, PartialEq, Debug)]
pub struct MatchArm {
    pub pattern: MatchPattern,
    pub body: StmtRange,
    pub span: Span,
}

/// Pattern tree.
#[derive(Clone, PartialEq, Debug)]
pub enum MatchPattern {
    /// `_`
    Wildcard,
    /// Binds the whole value.
    Binding(Name),
    Literal(LiteralPattern),
    /// `Some(p)`, `None`, `Ok(p)`, `Err(p)`.
    Variant {
        tag: VariantTag,
        inner: Option<Box<MatchPattern>>,
    },
    /// `[p, ...]`, exact length.
    List(Vec<MatchPattern>),
}

impl MatchPattern {
    /// Names this pattern binds, in left-to-right order.
    pub fn bindings(&self) -> Vec<Name> {
        let mut out = Vec::new();
        self.collect_bindings(&mut out);
        out
    }

    fn collect_bindings(&self, out: &mut Vec<Name>) {
        match self {
            MatchPattern::Binding(name) => out.push(*name),
            MatchPattern::Variant {
                inner: Some(inner), ..
            } => inner.collect_bindings(out),
            MatchPattern::List(items) => {
                for item in items {
                    item.collect_bindings(out);
                }
            }
            MatchPattern::Wildcard
            | MatchPattern::Literal(_)
            | MatchPattern::Variant { inner: None, .. } => {}
        }
    }
}

/// Literal pattern payloads.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum LiteralPattern {
    Int(i64),
    Float(f64),
    Str(Name),
    Bool(bool),
    Nil,
}

/// Constructor tag of a variant pattern.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VariantTag {
    Some,
    None,
    Ok,
    Err,
}

impl VariantTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            VariantTag::Some => "Some",
            VariantTag::None => "None",
            VariantTag::Ok => "Ok",
            VariantTag::Err => "Err",
        }
    }
}
