use basic_lex::{atof_prefix, LineCursor};
use basic_value::Value;

use crate::context::EvalContext;
use crate::error::EvalError;
use crate::evaluator::{or_expr, trunc_to_i32};
use crate::format::format_number;

/// The intrinsic function table (spec §4.7). Matched against an
/// upper-cased identifier *before* variable resolution, so a program that
/// never calls `LEN` can still have a variable named `LEN` in most BASIC
/// dialects — not this one, CBM v2 reserves the name, and so do we.
#[derive(Clone, Copy)]
pub(crate) enum Intrinsic {
    Sin,
    Cos,
    Tan,
    Atn,
    Abs,
    Int,
    Sqr,
    Sgn,
    Exp,
    Log,
    Rnd,
    Val,
    StrS,
    ChrS,
    Asc,
    Len,
    LeftS,
    RightS,
    MidS,
    Instr,
    Tab,
    Pos,
    Fre,
    Not,
}

pub(crate) fn lookup(name: &str) -> Option<Intrinsic> {
    use Intrinsic::*;
    Some(match name {
        "SIN" => Sin,
        "COS" => Cos,
        "TAN" => Tan,
        "ATN" => Atn,
        "ABS" => Abs,
        "INT" => Int,
        "SQR" => Sqr,
        "SGN" => Sgn,
        "EXP" => Exp,
        "LOG" => Log,
        "RND" => Rnd,
        "VAL" => Val,
        "STR$" => StrS,
        "CHR$" => ChrS,
        "ASC" => Asc,
        "LEN" => Len,
        "LEFT$" => LeftS,
        "RIGHT$" => RightS,
        "MID$" => MidS,
        "INSTR" => Instr,
        "TAB" => Tab,
        "POS" => Pos,
        "FRE" => Fre,
        "NOT" => Not,
        _ => return None,
    })
}

fn arity(intrinsic: Intrinsic) -> (usize, usize) {
    use Intrinsic::*;
    match intrinsic {
        LeftS | RightS | Instr => (2, 2),
        MidS => (2, 3),
        _ => (1, 1),
    }
}

/// Parses `(arg, arg, ...)` starting at the cursor (which must be at `(`
/// on entry — callers check for [`EvalError::FunctionRequiresParen`]
/// before calling this) and dispatches to the intrinsic's implementation.
pub(crate) fn call(intrinsic: Intrinsic, cursor: &mut LineCursor<'_>, ctx: &mut EvalContext<'_>) -> Result<Value, EvalError> {
    cursor.skip_whitespace();
    if cursor.current() != '(' {
        return Err(EvalError::FunctionRequiresParen);
    }
    cursor.advance();
    let args = read_args(intrinsic, cursor, ctx)?;
    cursor.skip_whitespace();
    if cursor.current() != ')' {
        return Err(EvalError::MissingCloseParen);
    }
    cursor.advance();
    evaluate(intrinsic, args, ctx)
}

fn read_args(intrinsic: Intrinsic, cursor: &mut LineCursor<'_>, ctx: &mut EvalContext<'_>) -> Result<Vec<Value>, EvalError> {
    let (min, max) = arity(intrinsic);
    let mut args = Vec::with_capacity(max);
    loop {
        args.push(or_expr(cursor, ctx)?);
        cursor.skip_whitespace();
        if cursor.current() == ',' {
            if args.len() >= max {
                return Err(EvalError::SyntaxError);
            }
            cursor.advance();
            continue;
        }
        break;
    }
    if args.len() < min {
        return Err(EvalError::SyntaxError);
    }
    Ok(args)
}

fn clamp_len(n: f64, max: usize) -> usize {
    let t = trunc_to_i32(n);
    if t < 0 {
        0
    } else {
        (t as usize).min(max)
    }
}

/// 1-indexed first occurrence of `needle` within `hay`, `0` if absent.
/// An empty needle matches at position 1.
fn find_char_substring(hay: &[char], needle: &[char]) -> usize {
    if needle.is_empty() {
        return 1;
    }
    if needle.len() > hay.len() {
        return 0;
    }
    for start in 0..=(hay.len() - needle.len()) {
        if &hay[start..start + needle.len()] == needle {
            return start + 1;
        }
    }
    0
}

fn evaluate(intrinsic: Intrinsic, args: Vec<Value>, ctx: &mut EvalContext<'_>) -> Result<Value, EvalError> {
    use Intrinsic::*;
    match intrinsic {
        Sin => Ok(Value::Number(args[0].as_number()?.sin())),
        Cos => Ok(Value::Number(args[0].as_number()?.cos())),
        Tan => Ok(Value::Number(args[0].as_number()?.tan())),
        Atn => Ok(Value::Number(args[0].as_number()?.atan())),
        Abs => Ok(Value::Number(args[0].as_number()?.abs())),
        Int => Ok(Value::Number(args[0].as_number()?.floor())),
        Sqr => Ok(Value::Number(args[0].as_number()?.sqrt())),
        Sgn => {
            let n = args[0].as_number()?;
            Ok(Value::Number(if n > 0.0 {
                1.0
            } else if n < 0.0 {
                -1.0
            } else {
                0.0
            }))
        }
        Exp => Ok(Value::Number(args[0].as_number()?.exp())),
        Log => Ok(Value::Number(args[0].as_number()?.ln())),
        Rnd => {
            let n = args[0].as_number()?;
            if n < 0.0 {
                ctx.rng.reseed(n);
            }
            Ok(Value::Number(ctx.rng.next()))
        }
        Val => Ok(Value::Number(atof_prefix(args[0].as_str()?))),
        StrS => Ok(Value::string_truncated(format_number(args[0].as_number()?))),
        ChrS => {
            let code = trunc_to_i32(args[0].as_number()?).rem_euclid(256) as u8;
            Ok(Value::String((code as char).to_string()))
        }
        Asc => {
            let s = args[0].as_str()?;
            Ok(Value::Number(s.chars().next().map(|c| c as u32 as f64).unwrap_or(0.0)))
        }
        Len => Ok(Value::Number(args[0].as_str()?.chars().count() as f64)),
        LeftS => {
            let s = args[0].as_str()?.to_string();
            let n = clamp_len(args[1].as_number()?, s.chars().count());
            Ok(Value::String(s.chars().take(n).collect()))
        }
        RightS => {
            let s = args[0].as_str()?.to_string();
            let total = s.chars().count();
            let n = clamp_len(args[1].as_number()?, total);
            Ok(Value::String(s.chars().skip(total - n).collect()))
        }
        MidS => {
            let s = args[0].as_str()?.to_string();
            let total = s.chars().count();
            let start = (trunc_to_i32(args[1].as_number()?).max(1) as usize).min(total + 1);
            let remaining = total + 1 - start;
            let len = if args.len() == 3 { clamp_len(args[2].as_number()?, remaining) } else { remaining };
            Ok(Value::String(s.chars().skip(start - 1).take(len).collect()))
        }
        Instr => {
            let hay: Vec<char> = args[0].as_str()?.chars().collect();
            let needle: Vec<char> = args[1].as_str()?.chars().collect();
            Ok(Value::Number(find_char_substring(&hay, &needle) as f64))
        }
        Tab => {
            let n = trunc_to_i32(args[0].as_number()?).max(0) as usize;
            ctx.column.pad_to_column(ctx.out, n);
            Ok(Value::empty_string())
        }
        Pos => {
            args[0].as_number()?;
            Ok(Value::Number(ctx.column.value() as f64 + 1.0))
        }
        Fre => {
            let _ = &args[0];
            Ok(Value::Number(38911.0))
        }
        Not => Ok(Value::Number(!trunc_to_i32(args[0].as_number()?) as f64)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basic_util::PrintColumn;
    use basic_value::VarStore;
    use crate::evaluator::evaluate as eval_expr;
    use crate::rng::RngState;

    struct NullOut;
    impl basic_util::TerminalOut for NullOut {
        fn write_str(&mut self, _text: &str) {}
    }

    fn eval(src: &str) -> Value {
        let mut vars = VarStore::new();
        let mut rng = RngState::new();
        let mut column = PrintColumn::new();
        let mut out = NullOut;
        let mut ctx = EvalContext { vars: &mut vars, rng: &mut rng, column: &mut column, out: &mut out };
        let mut cursor = LineCursor::new(src);
        eval_expr(&mut cursor, &mut ctx).unwrap()
    }

    #[test]
    fn left_mid_cover_the_whole_string() {
        assert_eq!(eval("LEFT$(\"HELLO WORLD\",5)"), Value::String("HELLO".into()));
        assert_eq!(eval("MID$(\"HELLO WORLD\",7,5)"), Value::String("WORLD".into()));
    }

    #[test]
    fn instr_locates_a_substring() {
        assert_eq!(eval("INSTR(\"HELLO WORLD\",\"O\")"), Value::Number(5.0));
        assert_eq!(eval("INSTR(\"HELLO\",\"Z\")"), Value::Number(0.0));
    }

    #[test]
    fn mid_without_length_runs_to_end_of_string() {
        assert_eq!(eval("MID$(\"HELLO\",2)"), Value::String("ELLO".into()));
    }

    #[test]
    fn right_clamps_to_string_length() {
        assert_eq!(eval("RIGHT$(\"AB\",10)"), Value::String("AB".into()));
    }

    #[test]
    fn val_tolerates_garbage_and_str_round_trips() {
        assert_eq!(eval("VAL(\"12ABC\")"), Value::Number(12.0));
        assert_eq!(eval("STR$(42)"), Value::String("42".into()));
    }

    #[test]
    fn chr_and_asc_are_inverse() {
        assert_eq!(eval("ASC(CHR$(65))"), Value::Number(65.0));
    }

    #[test]
    fn not_is_bitwise_complement() {
        assert_eq!(eval("NOT(0)"), Value::Number(-1.0));
    }

    #[test]
    fn int_floors_rather_than_truncates() {
        assert_eq!(eval("INT(-1.5)"), Value::Number(-2.0));
    }

    #[test]
    fn unknown_function_like_call_is_treated_as_unreachable_without_paren() {
        let mut vars = VarStore::new();
        let mut rng = RngState::new();
        let mut column = PrintColumn::new();
        let mut out = NullOut;
        let mut ctx = EvalContext { vars: &mut vars, rng: &mut rng, column: &mut column, out: &mut out };
        let mut cursor = LineCursor::new("LEN");
        assert_eq!(eval_expr(&mut cursor, &mut ctx), Err(EvalError::FunctionRequiresParen));
    }
}
