//! Parser for the one-line transition notation `from,input,top -> to,push`.

use miette::SourceSpan;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::errors::{DefinitionContext, ErrorReporting, PdaError, SourceContext};
use crate::model::{Guard, StackSymbol, State, Symbol, Transition, EPSILON};

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct NotationParser;

const EXPECTED_SHAPE: &str = "`state,input,top -> next,push`";

/// Parses a single transition.
pub fn parse_transition(line: &str) -> Result<Transition, PdaError> {
    let ctx = DefinitionContext::new(SourceContext::from_file("transition", line), "syntax");
    parse_transition_in(&ctx, line)
}

/// Parses a single transition, reporting errors against `ctx`.
pub fn parse_transition_in(ctx: &DefinitionContext, line: &str) -> Result<Transition, PdaError> {
    let mut pairs = NotationParser::parse(Rule::transition, line)
        .map_err(|e| convert_parse_error(ctx, line, e))?;

    // The grammar guarantees transition > (key, target), key > (state, input, top) and
    // target > (state, push); a mismatch here is reported as malformed input.
    let malformed = || ctx.malformed_transition(line, EXPECTED_SHAPE, span_of_line(line));
    let transition = pairs.next().ok_or_else(malformed)?;
    let mut parts = transition.into_inner();
    let mut key = parts.next().ok_or_else(malformed)?.into_inner();
    let mut target = parts.next().ok_or_else(malformed)?.into_inner();

    let from = State::new(key.next().ok_or_else(malformed)?.as_str());
    let input = input_guard(ctx, key.next().ok_or_else(malformed)?)?;
    let top = top_guard(ctx, key.next().ok_or_else(malformed)?)?;
    let to = State::new(target.next().ok_or_else(malformed)?.as_str());
    let push = push_sequence(ctx, target.next().ok_or_else(malformed)?)?;

    Ok(Transition::new(from, input, top, to, push))
}

fn is_epsilon_field(text: &str) -> bool {
    text.is_empty() || text == EPSILON || text == "eps"
}

fn input_guard(ctx: &DefinitionContext, pair: Pair<Rule>) -> Result<Guard<Symbol>, PdaError> {
    let text = pair.as_str();
    if is_epsilon_field(text) {
        return Ok(Guard::Epsilon);
    }
    Symbol::new(text)
        .map(Guard::Symbol)
        .ok_or_else(|| ctx.invalid_symbol("input", text, span_of(&pair)))
}

fn top_guard(ctx: &DefinitionContext, pair: Pair<Rule>) -> Result<Guard<StackSymbol>, PdaError> {
    let text = pair.as_str();
    if is_epsilon_field(text) {
        return Ok(Guard::Epsilon);
    }
    StackSymbol::new(text)
        .map(Guard::Symbol)
        .ok_or_else(|| ctx.invalid_symbol("stack", text, span_of(&pair)))
}

/// `eps` is not special here: it would be three ordinary stack symbols.
fn push_sequence(ctx: &DefinitionContext, pair: Pair<Rule>) -> Result<Vec<StackSymbol>, PdaError> {
    let text = pair.as_str();
    if text.is_empty() || text == EPSILON {
        return Ok(Vec::new());
    }
    let symbols = StackSymbol::sequence(text);
    if symbols.iter().any(|s| s.as_str() == EPSILON) {
        return Err(ctx
            .invalid_symbol("stack", EPSILON, span_of(&pair))
            .with_help("write an empty push field or a lone `ε` to push nothing"));
    }
    Ok(symbols)
}

fn span_of(pair: &Pair<Rule>) -> SourceSpan {
    let span = pair.as_span();
    SourceSpan::from(span.start()..span.end())
}

fn span_of_line(line: &str) -> SourceSpan {
    SourceSpan::from(0..line.len())
}

fn convert_parse_error(
    ctx: &DefinitionContext,
    line: &str,
    error: pest::error::Error<Rule>,
) -> PdaError {
    let span = match error.location {
        pest::error::InputLocation::Pos(pos) => SourceSpan::from(pos..pos),
        pest::error::InputLocation::Span((start, end)) => SourceSpan::from(start..end),
    };

    let help = if !line.contains("->") && !line.contains('→') {
        "separate the key from the target with `->` or `→`"
    } else if line.matches(',').count() != 3 {
        "a transition has three comma-separated key fields and two target fields"
    } else {
        "state names may not contain spaces, commas or arrows"
    };

    ctx.malformed_transition(line, EXPECTED_SHAPE, span)
        .with_help(help)
}
