use genregex::patterns::eq;
use genregex::Expression;
use quickcheck::{quickcheck, Arbitrary, Gen, TestResult};

/// Small regular expressions over the alphabet `{0, 1, 2}`, with a naive reference matcher.
#[derive(Clone, Debug)]
enum Re {
    Sym(u8),
    Or(Box<Re>, Box<Re>),
    Cat(Box<Re>, Box<Re>),
    Star(Box<Re>),
}

const ALPHABET: u8 = 3;
const MAX_DEPTH: usize = 3;
const MAX_INPUT: usize = 6;

fn arbitrary_re(g: &mut Gen, depth: usize) -> Re {
    let choice = if depth == 0 {
        0
    } else {
        *g.choose(&[0, 0, 1, 2, 3]).unwrap_or(&0)
    };
    match choice {
        1 => Re::Or(
            Box::new(arbitrary_re(g, depth - 1)),
            Box::new(arbitrary_re(g, depth - 1)),
        ),
        2 => Re::Cat(
            Box::new(arbitrary_re(g, depth - 1)),
            Box::new(arbitrary_re(g, depth - 1)),
        ),
        3 => Re::Star(Box::new(arbitrary_re(g, depth - 1))),
        _ => Re::Sym(u8::arbitrary(g) % ALPHABET),
    }
}

impl Arbitrary for Re {
    fn arbitrary(g: &mut Gen) -> Self {
        arbitrary_re(g, MAX_DEPTH)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Re::Sym(_) => quickcheck::empty_shrinker(),
            Re::Or(l, r) | Re::Cat(l, r) => {
                Box::new(vec![(**l).clone(), (**r).clone()].into_iter())
            }
            Re::Star(i) => quickcheck::single_shrinker((**i).clone()),
        }
    }
}

impl Re {
    fn to_expression(&self) -> Expression<u8> {
        match self {
            Re::Sym(v) => eq(*v),
            Re::Or(l, r) => Expression::union(l.to_expression(), r.to_expression()),
            Re::Cat(l, r) => Expression::concat(l.to_expression(), r.to_expression()),
            Re::Star(i) => Expression::star(i.to_expression()),
        }
    }

    /// Tries every way of splitting the input; exponential, but obviously correct.
    fn reference(&self, s: &[u8]) -> bool {
        match self {
            Re::Sym(v) => s == [*v],
            Re::Or(l, r) => l.reference(s) || r.reference(s),
            Re::Cat(l, r) => (0..=s.len()).any(|i| l.reference(&s[..i]) && r.reference(&s[i..])),
            Re::Star(i) => {
                s.is_empty()
                    || (1..=s.len()).any(|n| i.reference(&s[..n]) && self.reference(&s[n..]))
            }
        }
    }
}

fn input(raw: Vec<u8>) -> Vec<u8> {
    raw.into_iter().take(MAX_INPUT).map(|x| x % ALPHABET).collect()
}

fn matches(e: &Expression<u8>, s: &[u8]) -> bool {
    e.compile_accepting()
        .map(|nfa| nfa.is_match(s))
        .unwrap_or_default()
}

#[test]
fn agrees_with_reference() {
    fn prop(re: Re, raw: Vec<u8>) -> bool {
        let s = input(raw);
        matches(&re.to_expression(), &s) == re.reference(&s)
    }
    quickcheck(prop as fn(Re, Vec<u8>) -> bool);
}

#[test]
fn union_is_symmetric() {
    fn prop(a: Re, b: Re, raw: Vec<u8>) -> bool {
        let s = input(raw);
        let ab = matches(&Expression::union(a.to_expression(), b.to_expression()), &s);
        let ba = matches(&Expression::union(b.to_expression(), a.to_expression()), &s);
        let either = matches(&a.to_expression(), &s) || matches(&b.to_expression(), &s);
        ab == ba && ab == either
    }
    quickcheck(prop as fn(Re, Re, Vec<u8>) -> bool);
}

#[test]
fn concatenation_splits() {
    fn prop(a: Re, b: Re, raw: Vec<u8>) -> bool {
        let s = input(raw);
        let (ea, eb) = (a.to_expression(), b.to_expression());
        let whole = matches(&Expression::concat(ea.clone(), eb.clone()), &s);
        let split = (0..=s.len()).any(|i| matches(&ea, &s[..i]) && matches(&eb, &s[i..]));
        whole == split
    }
    quickcheck(prop as fn(Re, Re, Vec<u8>) -> bool);
}

#[test]
fn star_accepts_repetitions() {
    fn prop(a: Re, segments: Vec<Vec<u8>>) -> TestResult {
        let ea = a.to_expression();
        let segments: Vec<Vec<u8>> = segments
            .into_iter()
            .take(4)
            .map(input)
            .filter(|s| matches(&ea, s))
            .collect();
        if segments.is_empty() {
            return TestResult::discard();
        }

        let joined: Vec<u8> = segments.concat();
        TestResult::from_bool(matches(&Expression::star(ea), &joined))
    }
    quickcheck(prop as fn(Re, Vec<Vec<u8>>) -> TestResult);
}

#[test]
fn star_accepts_empty() {
    fn prop(a: Re) -> bool {
        matches(&Expression::star(a.to_expression()), &[])
    }
    quickcheck(prop as fn(Re) -> bool);
}

#[test]
fn nullable_agrees_with_matching() {
    fn prop(a: Re) -> bool {
        let e = a.to_expression();
        e.is_nullable() == matches(&e, &[])
    }
    quickcheck(prop as fn(Re) -> bool);
}

#[test]
fn closure_is_idempotent() {
    fn prop(a: Re, seeds: Vec<usize>) -> bool {
        let Ok(nfa) = a.to_expression().compile() else {
            return false;
        };
        let once = nfa.epsilon_closure(seeds.into_iter().map(|s| s % nfa.len()));
        let twice = nfa.epsilon_closure(once.iter());
        once == twice
    }
    quickcheck(prop as fn(Re, Vec<usize>) -> bool);
}

#[test]
fn end_is_reachable() {
    fn prop(a: Re) -> bool {
        let Ok(nfa) = a.to_expression().compile() else {
            return false;
        };
        nfa.reachable_from(nfa.start()).contains(nfa.end())
    }
    quickcheck(prop as fn(Re) -> bool);
}
