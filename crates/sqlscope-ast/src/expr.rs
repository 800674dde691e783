//! Predicate expression tree
//!
//! Expressions start out with unresolved [`ColumnRef`]s as written in the
//! query. Binding replaces each of them with a [`SlotRef`] naming the slot and
//! tuple it resolved to, after which the tuple-level helpers here
//! (`tuple_ids`, `is_bound_by`, ...) describe what the predicate depends on.

use crate::{BinaryOp, CompoundOp, Literal, SlotId, TupleId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An unresolved `[qualifier.]name` column reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Table alias qualifier, if written
    pub qualifier: Option<String>,
    /// Column name
    pub name: String,
}

impl ColumnRef {
    pub fn new(qualifier: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            qualifier: qualifier.map(str::to_string),
            name: name.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}.{}", q, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A column reference resolved to a slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub slot_id: SlotId,
    pub tuple_id: TupleId,
    /// Text the reference was written as, kept for display
    pub label: String,
}

/// A binary comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// AND / OR over any number of children, or NOT over exactly one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundExpr {
    pub op: CompoundOp,
    pub children: Vec<Expr>,
}

/// `expr IS [NOT] NULL`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsNullExpr {
    pub operand: Box<Expr>,
    pub negated: bool,
}

/// `expr [NOT] IN (list)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InListExpr {
    pub operand: Box<Expr>,
    pub list: Vec<Expr>,
    pub negated: bool,
}

/// A scalar function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
}

/// Predicate and scalar expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Literal value
    Literal(Literal),
    /// Column reference before binding
    Column(ColumnRef),
    /// Column reference after binding
    Slot(SlotRef),
    /// Comparison
    Binary(BinaryExpr),
    /// AND / OR / NOT
    Compound(CompoundExpr),
    /// IS [NOT] NULL
    IsNull(IsNullExpr),
    /// [NOT] IN list
    InList(InListExpr),
    /// Function call
    Function(FunctionCall),
}

impl Expr {
    // === Constructors ===

    pub fn literal(value: impl Into<Literal>) -> Self {
        Self::Literal(value.into())
    }

    pub fn int(value: i64) -> Self {
        Self::Literal(Literal::Integer(value))
    }

    pub fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    /// Unqualified column reference
    pub fn col(name: impl Into<String>) -> Self {
        Self::Column(ColumnRef::new(None, name))
    }

    /// Qualified column reference
    pub fn qualified(qualifier: &str, name: impl Into<String>) -> Self {
        Self::Column(ColumnRef::new(Some(qualifier), name))
    }

    pub fn slot(slot_id: SlotId, tuple_id: TupleId, label: impl Into<String>) -> Self {
        Self::Slot(SlotRef {
            slot_id,
            tuple_id,
            label: label.into(),
        })
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Eq, left, right)
    }

    pub fn gt(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Gt, left, right)
    }

    pub fn lt(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Lt, left, right)
    }

    pub fn and(children: Vec<Expr>) -> Self {
        Self::Compound(CompoundExpr {
            op: CompoundOp::And,
            children,
        })
    }

    pub fn or(children: Vec<Expr>) -> Self {
        Self::Compound(CompoundExpr {
            op: CompoundOp::Or,
            children,
        })
    }

    pub fn not(child: Expr) -> Self {
        Self::Compound(CompoundExpr {
            op: CompoundOp::Not,
            children: vec![child],
        })
    }

    pub fn is_null(operand: Expr, negated: bool) -> Self {
        Self::IsNull(IsNullExpr {
            operand: Box::new(operand),
            negated,
        })
    }

    pub fn in_list(operand: Expr, list: Vec<Expr>, negated: bool) -> Self {
        Self::InList(InListExpr {
            operand: Box::new(operand),
            list,
            negated,
        })
    }

    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Function(FunctionCall {
            name: name.into(),
            args,
        })
    }

    // === Traversal ===

    /// Direct children of this node
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Self::Literal(_) | Self::Column(_) | Self::Slot(_) => Vec::new(),
            Self::Binary(b) => vec![b.left.as_ref(), b.right.as_ref()],
            Self::Compound(c) => c.children.iter().collect(),
            Self::IsNull(n) => vec![n.operand.as_ref()],
            Self::InList(i) => std::iter::once(i.operand.as_ref())
                .chain(i.list.iter())
                .collect(),
            Self::Function(f) => f.args.iter().collect(),
        }
    }

    /// Visit this node and every descendant, pre-order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Every resolved slot reference in the tree
    pub fn slot_refs(&self) -> Vec<&SlotRef> {
        let mut refs = Vec::new();
        self.walk(&mut |e| {
            if let Self::Slot(s) = e {
                refs.push(s);
            }
        });
        refs
    }

    /// Distinct tuples the expression references
    pub fn tuple_ids(&self) -> BTreeSet<TupleId> {
        self.slot_refs().into_iter().map(|s| s.tuple_id).collect()
    }

    /// Distinct slots the expression references
    pub fn slot_ids(&self) -> BTreeSet<SlotId> {
        self.slot_refs().into_iter().map(|s| s.slot_id).collect()
    }

    /// True if no column or slot is referenced anywhere
    pub fn is_constant(&self) -> bool {
        let mut constant = true;
        self.walk(&mut |e| {
            if matches!(e, Self::Column(_) | Self::Slot(_)) {
                constant = false;
            }
        });
        constant
    }

    /// True if every referenced tuple is in `tuple_ids`
    pub fn is_bound_by(&self, tuple_ids: &BTreeSet<TupleId>) -> bool {
        self.slot_refs()
            .iter()
            .all(|s| tuple_ids.contains(&s.tuple_id))
    }

    /// Check if any column reference is still unresolved
    pub fn has_unresolved_columns(&self) -> bool {
        let mut unresolved = false;
        self.walk(&mut |e| {
            if matches!(e, Self::Column(_)) {
                unresolved = true;
            }
        });
        unresolved
    }

    /// Split a tree of ANDs into its conjuncts
    pub fn split_conjuncts(self) -> Vec<Expr> {
        match self {
            Self::Compound(CompoundExpr {
                op: CompoundOp::And,
                children,
            }) => children
                .into_iter()
                .flat_map(Expr::split_conjuncts)
                .collect(),
            other => vec![other],
        }
    }
}

impl From<Literal> for Expr {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(l) => write!(f, "{l}"),
            Self::Column(c) => write!(f, "{c}"),
            Self::Slot(s) => write!(f, "{}", s.label),
            Self::Binary(b) => write!(f, "{} {} {}", b.left, b.op.symbol(), b.right),
            Self::Compound(c) if c.op == CompoundOp::Not => match c.children.first() {
                Some(child) => write!(f, "NOT ({child})"),
                None => write!(f, "NOT ()"),
            },
            Self::Compound(c) => {
                write!(f, "(")?;
                for (i, child) in c.children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", c.op.keyword())?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
            Self::IsNull(n) if n.negated => write!(f, "{} IS NOT NULL", n.operand),
            Self::IsNull(n) => write!(f, "{} IS NULL", n.operand),
            Self::InList(i) => {
                let keyword = if i.negated { "NOT IN" } else { "IN" };
                write!(f, "{} {keyword} (", i.operand)?;
                write_list(f, &i.list)?;
                write!(f, ")")
            }
            Self::Function(func) => {
                write!(f, "{}(", func.name)?;
                write_list(f, &func.args)?;
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn slot(s: u32, t: u32, label: &str) -> Expr {
        Expr::slot(SlotId::new(s), TupleId::new(t), label)
    }

    #[test]
    fn test_tuple_ids_and_binding() {
        let expr = Expr::and(vec![
            Expr::gt(slot(0, 1, "b.x"), Expr::int(5)),
            Expr::eq(slot(1, 0, "a.id"), slot(2, 1, "b.id")),
        ]);

        let ids = expr.tuple_ids();
        assert_eq!(ids, BTreeSet::from([TupleId::new(0), TupleId::new(1)]));
        assert_eq!(expr.slot_ids().len(), 3);
        assert!(expr.is_bound_by(&ids));
        assert!(!expr.is_bound_by(&BTreeSet::from([TupleId::new(1)])));
        assert!(!expr.is_constant());
    }

    #[test]
    fn test_constant() {
        let expr = Expr::eq(Expr::int(1), Expr::function("abs", vec![Expr::int(-1)]));
        assert!(expr.is_constant());
        assert!(expr.tuple_ids().is_empty());
        assert!(expr.is_bound_by(&BTreeSet::new()));

        assert!(!Expr::is_null(Expr::col("x"), false).is_constant());
    }

    #[test]
    fn test_split_conjuncts_flattens_nested_and() {
        let expr = Expr::and(vec![
            Expr::and(vec![Expr::col("a"), Expr::col("b")]),
            Expr::or(vec![Expr::col("c"), Expr::col("d")]),
        ]);

        let conjuncts = expr.split_conjuncts();
        assert_eq!(conjuncts.len(), 3);
        assert_eq!(conjuncts[2].to_string(), "(c OR d)");
    }

    #[test]
    fn test_display() {
        let expr = Expr::and(vec![
            Expr::in_list(
                Expr::qualified("o", "status"),
                vec![Expr::literal("A"), Expr::literal("B")],
                true,
            ),
            Expr::not(Expr::is_null(Expr::col("x"), true)),
        ]);
        assert_eq!(
            expr.to_string(),
            "(o.status NOT IN ('A', 'B') AND NOT (x IS NOT NULL))"
        );
    }

    #[test]
    fn test_unresolved_columns() {
        assert!(Expr::gt(Expr::col("x"), Expr::int(1)).has_unresolved_columns());
        assert!(!Expr::gt(slot(0, 0, "x"), Expr::int(1)).has_unresolved_columns());
    }
}
