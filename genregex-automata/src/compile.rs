use crate::expression::{Child, Expression, ExpressionKind};
use crate::nfa::{Fragment, Label, Nfa, State, StateId, Transition};
use crate::{CompileError, Slot};

/// Translates [`Expression`]s into [`Nfa`]s using Thompson's construction.
///
/// Every compilation allocates a fresh automaton; the expression is only read.
/// A sub-expression that occurs more than once in a tree is compiled once per occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    state_limit: Option<usize>,
}

impl Compiler {
    /// A compiler without a state limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`CompileError::StateLimitExceeded`] instead of building an automaton
    /// with more than `limit` states.
    pub fn with_state_limit(mut self, limit: usize) -> Self {
        self.state_limit = Some(limit);
        self
    }

    /// The configured maximum number of states, if any.
    pub fn state_limit(&self) -> Option<usize> {
        self.state_limit
    }

    /// Compiles `expression`. No state of the result is accepting.
    pub fn compile<T>(&self, expression: &Expression<T>) -> Result<Nfa<T>, CompileError> {
        let mut builder = NfaBuilder {
            state_limit: self.state_limit,
            states: Vec::new(),
        };

        let fragment = builder.fragment(expression)?;
        log::debug!(
            "compiled {} expression with {} predicates into {} states, fragment {fragment:?}",
            expression.kind(),
            expression.predicate_count(),
            builder.states.len()
        );

        Ok(Nfa::from_parts(builder.states, fragment))
    }

    /// Compiles `expression` and marks the end of the top-level fragment as accepting.
    pub fn compile_accepting<T>(
        &self,
        expression: &Expression<T>,
    ) -> Result<Nfa<T>, CompileError> {
        let mut nfa = self.compile(expression)?;
        nfa.mark_accepting(nfa.end());
        Ok(nfa)
    }
}

impl<T> Expression<T> {
    /// Compiles this expression with a default [`Compiler`].
    pub fn compile(&self) -> Result<Nfa<T>, CompileError> {
        Compiler::new().compile(self)
    }

    /// Compiles this expression, accepting exactly the sequences it matches.
    pub fn compile_accepting(&self) -> Result<Nfa<T>, CompileError> {
        Compiler::new().compile_accepting(self)
    }
}

struct NfaBuilder<T> {
    state_limit: Option<usize>,
    states: Vec<State<T>>,
}

impl<T> NfaBuilder<T> {
    fn add_state(&mut self) -> Result<StateId, CompileError> {
        if let Some(limit) = self.state_limit {
            if self.states.len() >= limit {
                return Err(CompileError::StateLimitExceeded { limit });
            }
        }

        self.states.push(State::new());
        Ok(self.states.len() - 1)
    }

    fn add_transition(&mut self, from: StateId, label: Label<T>, to: StateId) {
        if let Some(state) = self.states.get_mut(from) {
            state.push(Transition::new(label, to));
        }
    }

    fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.add_transition(from, Label::Epsilon, to);
    }

    /// Thompson's construction, driven by an explicit stack so deep trees cannot
    /// exhaust the call stack.
    ///
    /// Nodes with states of their own allocate them before their children, and
    /// children are visited left to right.
    fn fragment(&mut self, expression: &Expression<T>) -> Result<Fragment, CompileError> {
        let mut frames = vec![Frame::Enter(expression)];
        let mut fragments = Vec::new();

        while let Some(frame) = frames.pop() {
            match frame {
                Frame::Enter(Expression::Predicate(p)) => {
                    let start = self.add_state()?;
                    let end = self.add_state()?;
                    self.add_transition(start, Label::OnPredicate(p.clone()), end);
                    finish(ExpressionKind::Predicate, Fragment { start, end }, &mut fragments);
                }
                Frame::Enter(Expression::Union(l, r)) => {
                    let (l, r) = (
                        required(l, ExpressionKind::Union, Slot::Left)?,
                        required(r, ExpressionKind::Union, Slot::Right)?,
                    );

                    let start = self.add_state()?;
                    let end = self.add_state()?;
                    frames.extend([
                        Frame::Union(Fragment { start, end }),
                        Frame::Enter(r),
                        Frame::Enter(l),
                    ]);
                }
                Frame::Enter(Expression::Concatenation(l, r)) => {
                    let (l, r) = (
                        required(l, ExpressionKind::Concatenation, Slot::Left)?,
                        required(r, ExpressionKind::Concatenation, Slot::Right)?,
                    );

                    frames.extend([Frame::Concatenation, Frame::Enter(r), Frame::Enter(l)]);
                }
                Frame::Enter(Expression::KleeneStar(i)) => {
                    let i = required(i, ExpressionKind::KleeneStar, Slot::Operand)?;

                    let start = self.add_state()?;
                    let end = self.add_state()?;
                    frames.extend([Frame::KleeneStar(Fragment { start, end }), Frame::Enter(i)]);
                }
                Frame::Union(outer) => {
                    let r = pop_fragment(&mut fragments);
                    let l = pop_fragment(&mut fragments);

                    self.add_epsilon(outer.start, l.start);
                    self.add_epsilon(outer.start, r.start);
                    self.add_epsilon(l.end, outer.end);
                    self.add_epsilon(r.end, outer.end);
                    finish(ExpressionKind::Union, outer, &mut fragments);
                }
                Frame::Concatenation => {
                    let r = pop_fragment(&mut fragments);
                    let l = pop_fragment(&mut fragments);

                    // l.end and r.start stay separate states
                    self.add_epsilon(l.end, r.start);
                    let fragment = Fragment {
                        start: l.start,
                        end: r.end,
                    };
                    finish(ExpressionKind::Concatenation, fragment, &mut fragments);
                }
                Frame::KleeneStar(outer) => {
                    let i = pop_fragment(&mut fragments);

                    // enter
                    self.add_epsilon(outer.start, i.start);
                    // skip
                    self.add_epsilon(outer.start, outer.end);
                    // repeat
                    self.add_epsilon(i.end, i.start);
                    // exit
                    self.add_epsilon(i.end, outer.end);
                    finish(ExpressionKind::KleeneStar, outer, &mut fragments);
                }
            }
        }

        Ok(pop_fragment(&mut fragments))
    }
}

/// Pending work of [`NfaBuilder::fragment`].
enum Frame<'a, T> {
    /// Compile this node; its children are compiled by frames pushed on top.
    Enter(&'a Expression<T>),
    /// Both operands are compiled; connect them to the union's own states.
    Union(Fragment),
    /// Both operands are compiled; chain them.
    Concatenation,
    /// The operand is compiled; wrap it in the star's own states.
    KleeneStar(Fragment),
}

fn finish(kind: ExpressionKind, fragment: Fragment, fragments: &mut Vec<Fragment>) {
    log::trace!("{kind} node compiled to {fragment:?}");
    fragments.push(fragment);
}

fn pop_fragment(fragments: &mut Vec<Fragment>) -> Fragment {
    fragments
        .pop()
        .expect("every compiled child leaves exactly one fragment")
}

fn required<T>(
    child: &Child<T>,
    kind: ExpressionKind,
    missing: Slot,
) -> Result<&Expression<T>, CompileError> {
    child
        .as_deref()
        .ok_or(CompileError::MalformedExpression { kind, missing })
}
