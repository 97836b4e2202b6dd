use crate::predicate::Predicate;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// A sub-expression slot. Empty while a tree is still being assembled.
pub type Child<T> = Option<Arc<Expression<T>>>;

/// A generalized regular expression over elements of type `T`.
///
/// The atoms are [`Predicate`]s rather than characters.
/// Children are shared, so the same sub-expression may occur in several places of a tree.
/// A child that is `None` makes the expression malformed; this is only discovered when
/// it is [compiled](Expression::compile).
pub enum Expression<T> {
    /// Matches exactly one element for which the predicate holds.
    Predicate(Predicate<T>),
    /// Matches whatever either side matches.
    Union(Child<T>, Child<T>),
    /// Matches the left side immediately followed by the right side.
    Concatenation(Child<T>, Child<T>),
    /// Matches zero or more repetitions of the operand.
    KleeneStar(Child<T>),
}

/// The four node kinds of an [`Expression`], without their contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    Predicate,
    Union,
    Concatenation,
    KleeneStar,
}

impl Display for ExpressionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpressionKind::Predicate => write!(f, "predicate"),
            ExpressionKind::Union => write!(f, "union"),
            ExpressionKind::Concatenation => write!(f, "concatenation"),
            ExpressionKind::KleeneStar => write!(f, "kleene star"),
        }
    }
}

impl<T> Expression<T> {
    /// A leaf matching one element satisfying `predicate`.
    pub fn predicate(predicate: Predicate<T>) -> Self {
        Expression::Predicate(predicate)
    }

    /// `lhs | rhs`
    pub fn union(lhs: impl Into<Arc<Self>>, rhs: impl Into<Arc<Self>>) -> Self {
        Expression::Union(Some(lhs.into()), Some(rhs.into()))
    }

    /// `lhs rhs`
    pub fn concat(lhs: impl Into<Arc<Self>>, rhs: impl Into<Arc<Self>>) -> Self {
        Expression::Concatenation(Some(lhs.into()), Some(rhs.into()))
    }

    /// `operand*`
    pub fn star(operand: impl Into<Arc<Self>>) -> Self {
        Expression::KleeneStar(Some(operand.into()))
    }

    /// `operand+`, desugared to `operand operand*`.
    ///
    /// Both occurrences share the same operand; each is compiled into its own states.
    pub fn plus(operand: impl Into<Arc<Self>>) -> Self {
        let operand = operand.into();
        Expression::concat(operand.clone(), Expression::star(operand))
    }

    /// Concatenation of all `parts`, in order.
    ///
    /// The tree is balanced, so its depth grows with the logarithm of the number of parts.
    /// There is no expression for the empty sequence, so this is `None` when `parts` is empty.
    pub fn sequence<I>(parts: I) -> Option<Self>
    where
        I: IntoIterator,
        I::Item: Into<Arc<Self>>,
    {
        fold_balanced(parts, |l, r| Expression::concat(l, r))
    }

    /// Union of all `alternatives`, as a balanced tree.
    ///
    /// `None` when `alternatives` is empty.
    pub fn alternation<I>(alternatives: I) -> Option<Self>
    where
        I: IntoIterator,
        I::Item: Into<Arc<Self>>,
    {
        fold_balanced(alternatives, |l, r| Expression::union(l, r))
    }

    /// The kind of the root node.
    pub fn kind(&self) -> ExpressionKind {
        match self {
            Expression::Predicate(_) => ExpressionKind::Predicate,
            Expression::Union(..) => ExpressionKind::Union,
            Expression::Concatenation(..) => ExpressionKind::Concatenation,
            Expression::KleeneStar(_) => ExpressionKind::KleeneStar,
        }
    }

    /// Returns true if no child slot anywhere in the tree is empty.
    pub fn is_complete(&self) -> bool {
        self.slots().all(|slot| slot.is_some())
    }

    /// Returns true if this expression matches the empty sequence.
    ///
    /// Missing children match nothing.
    pub fn is_nullable(&self) -> bool {
        enum Frame<'a, T> {
            Visit(Option<&'a Expression<T>>),
            Either,
            Both,
        }

        let mut frames = vec![Frame::Visit(Some(self))];
        let mut results = Vec::new();

        while let Some(frame) = frames.pop() {
            match frame {
                Frame::Visit(None | Some(Expression::Predicate(_))) => results.push(false),
                Frame::Visit(Some(Expression::KleeneStar(_))) => results.push(true),
                Frame::Visit(Some(Expression::Union(l, r))) => frames.extend([
                    Frame::Either,
                    Frame::Visit(r.as_deref()),
                    Frame::Visit(l.as_deref()),
                ]),
                Frame::Visit(Some(Expression::Concatenation(l, r))) => frames.extend([
                    Frame::Both,
                    Frame::Visit(r.as_deref()),
                    Frame::Visit(l.as_deref()),
                ]),
                Frame::Either => {
                    let (r, l) = (results.pop(), results.pop());
                    results.push(r.unwrap_or_default() || l.unwrap_or_default());
                }
                Frame::Both => {
                    let (r, l) = (results.pop(), results.pop());
                    results.push(r.unwrap_or_default() && l.unwrap_or_default());
                }
            }
        }

        results.pop().unwrap_or_default()
    }

    /// Number of predicate leaves in the tree, counting shared sub-expressions once per occurrence.
    pub fn predicate_count(&self) -> usize {
        self.slots()
            .flatten()
            .filter(|e| e.kind() == ExpressionKind::Predicate)
            .count()
    }

    /// Every child slot of the tree in pre-order, starting with the root itself.
    fn slots(&self) -> Slots<'_, T> {
        Slots {
            stack: vec![Some(self)],
        }
    }
}

struct Slots<'a, T> {
    stack: Vec<Option<&'a Expression<T>>>,
}

impl<'a, T> Iterator for Slots<'a, T> {
    type Item = Option<&'a Expression<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.stack.pop()?;
        match slot {
            None | Some(Expression::Predicate(_)) => {}
            Some(Expression::Union(l, r) | Expression::Concatenation(l, r)) => {
                self.stack.extend([r.as_deref(), l.as_deref()])
            }
            Some(Expression::KleeneStar(i)) => self.stack.push(i.as_deref()),
        }
        Some(slot)
    }
}

fn fold_balanced<T, I>(
    parts: I,
    combine: impl Fn(Arc<Expression<T>>, Arc<Expression<T>>) -> Expression<T>,
) -> Option<Expression<T>>
where
    I: IntoIterator,
    I::Item: Into<Arc<Expression<T>>>,
{
    let mut level: Vec<Arc<Expression<T>>> = parts
        .into_iter()
        .map(Into::<Arc<Expression<T>>>::into)
        .collect();

    // combine neighbours pairwise until one tree is left
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut parts = level.into_iter();
        while let Some(l) = parts.next() {
            match parts.next() {
                Some(r) => next.push(Arc::new(combine(l, r))),
                None => next.push(l),
            }
        }
        level = next;
    }

    let folded = level.pop()?;
    Some(Arc::try_unwrap(folded).unwrap_or_else(|shared| (*shared).clone()))
}

impl<T> Clone for Expression<T> {
    fn clone(&self) -> Self {
        match self {
            Expression::Predicate(p) => Expression::Predicate(p.clone()),
            Expression::Union(l, r) => Expression::Union(l.clone(), r.clone()),
            Expression::Concatenation(l, r) => Expression::Concatenation(l.clone(), r.clone()),
            Expression::KleeneStar(i) => Expression::KleeneStar(i.clone()),
        }
    }
}

impl<T> Drop for Expression<T> {
    fn drop(&mut self) {
        let mut orphans = Vec::new();
        self.take_children(&mut orphans);

        // children owned by nobody else are emptied here, so their own drop is shallow
        while let Some(child) = orphans.pop() {
            if let Ok(mut child) = Arc::try_unwrap(child) {
                child.take_children(&mut orphans);
            }
        }
    }
}

impl<T> Expression<T> {
    fn take_children(&mut self, into: &mut Vec<Arc<Expression<T>>>) {
        match self {
            Expression::Predicate(_) => {}
            Expression::Union(l, r) | Expression::Concatenation(l, r) => {
                into.extend(l.take());
                into.extend(r.take());
            }
            Expression::KleeneStar(i) => into.extend(i.take()),
        }
    }
}

enum Token<'a, T> {
    Node(&'a Expression<T>),
    Missing,
    Text(&'static str),
}

fn token<T>(child: &Child<T>) -> Token<'_, T> {
    child.as_deref().map_or(Token::Missing, Token::Node)
}

impl<T> Display for Expression<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // pushed in reverse, so the top of the stack is printed next
        let mut stack = vec![Token::Node(self)];

        while let Some(next) = stack.pop() {
            match next {
                Token::Text(text) => f.write_str(text)?,
                Token::Missing => f.write_str("_")?,
                Token::Node(Expression::Predicate(p)) => write!(f, "{p:?}")?,
                Token::Node(Expression::Union(a, b)) => stack.extend([
                    Token::Text(")"),
                    token(b),
                    Token::Text(" | "),
                    token(a),
                    Token::Text("("),
                ]),
                Token::Node(Expression::Concatenation(a, b)) => {
                    stack.extend([token(b), Token::Text(" "), token(a)])
                }
                Token::Node(Expression::KleeneStar(r)) => {
                    stack.extend([Token::Text(")*"), token(r), Token::Text("(")])
                }
            }
        }

        Ok(())
    }
}

impl<T> Debug for Expression<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}
