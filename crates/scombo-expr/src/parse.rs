//! Recursive-descent parser with operator-precedence folding.
//!
//! The grammar:
//!
//! ```text
//! top     := atom (binop atom)*
//! atom    := INT | 'defined' atom | '(' top ')' | '$' ident | '!' atom
//! binop   := '&&' | '||' | '==' | '!=' | '<=' | '>=' | '<' | '>'
//! ident   := [A-Za-z0-9_]+
//! ```
//!
//! Whitespace is skipped between atoms and operators only. `defined X`
//! evaluates `X` against the parse context and embeds the result as a
//! constant; it does not test for presence.
//!
//! Failure handling is lenient by contract: a sub-parse that hits
//! unexpected input consumes the remainder of the text and yields the
//! constant 0, and any text left unconsumed after the top-level parse
//! collapses the whole expression to 0.

use crate::ast::{BinaryOp, EvalContext, Expr};

/// Parse `text` against `ctx`.
///
/// `ctx` supplies name-to-slot resolution for `$NAME` references and the
/// variable values read by `defined`. Never fails: malformed input yields
/// `Expr::Const(0)`.
#[must_use]
pub fn parse(text: &str, ctx: &dyn EvalContext) -> Expr {
    let mut parser = Parser {
        src: text.as_bytes(),
        pos: 0,
        ctx,
    };
    let root = parser.parse_binary_chain();
    if parser.pos == text.len() {
        root
    } else {
        Expr::Const(0)
    }
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    ctx: &'a dyn EvalContext,
}

impl Parser<'_> {
    /// Abandon the current sub-parse: the rest of the input is treated as
    /// consumed-and-invalid, and the subexpression becomes constant false.
    /// The caller-visible effect is that `pos` stops short of the original
    /// input length, which collapses the root in [`parse`].
    fn abort(&mut self) -> Expr {
        self.src = &self.src[..self.pos];
        Expr::Const(0)
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self
            .peek()
            .is_some_and(|ch| ch.is_ascii_whitespace())
        {
            self.pos += 1;
        }
    }

    /// `top := atom (binop atom)*`, folded by priority as operators
    /// arrive.
    fn parse_binary_chain(&mut self) -> Expr {
        // Stack of operators whose right operand is still open; `cur` is
        // the rightmost parsed operand. A looser incoming operator folds
        // the tighter ops below it into its left side. Equal priorities do
        // not fold, so same-level chains associate to the right.
        let mut stack: Vec<(BinaryOp, Expr)> = Vec::new();
        let mut cur = self.parse_atom();

        loop {
            self.skip_whitespace();
            match self.peek() {
                None | Some(b')') => break,
                Some(_) => {}
            }

            let Some(op) = self.eat_operator() else {
                return self.abort();
            };

            while stack
                .last()
                .is_some_and(|(top, _)| op.priority() > top.priority())
            {
                let (folded, left) = stack.pop().expect("stack checked non-empty");
                cur = Expr::Binary {
                    op: folded,
                    left: Box::new(left),
                    right: Box::new(cur),
                };
            }
            stack.push((op, cur));
            cur = self.parse_atom();
        }

        while let Some((op, left)) = stack.pop() {
            cur = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(cur),
            };
        }
        cur
    }

    fn eat_operator(&mut self) -> Option<BinaryOp> {
        let rest = &self.src[self.pos..];
        let (op, len) = if rest.starts_with(b"&&") {
            (BinaryOp::And, 2)
        } else if rest.starts_with(b"||") {
            (BinaryOp::Or, 2)
        } else if rest.starts_with(b">=") {
            (BinaryOp::Ge, 2)
        } else if rest.starts_with(b"<=") {
            (BinaryOp::Le, 2)
        } else if rest.starts_with(b"==") {
            (BinaryOp::Eq, 2)
        } else if rest.starts_with(b"!=") {
            (BinaryOp::Neq, 2)
        } else if rest.first() == Some(&b'>') {
            (BinaryOp::Gt, 1)
        } else if rest.first() == Some(&b'<') {
            (BinaryOp::Lt, 1)
        } else {
            return None;
        };
        self.pos += len;
        Some(op)
    }

    fn parse_atom(&mut self) -> Expr {
        self.skip_whitespace();
        let Some(ch) = self.peek() else {
            return self.abort();
        };

        if ch.is_ascii_digit() {
            return self.parse_number();
        }
        if self.src[self.pos..].starts_with(b"defined") {
            self.pos += b"defined".len();
            let inner = self.parse_atom();
            return Expr::Const(inner.evaluate(self.ctx));
        }

        match ch {
            b'(' => {
                self.pos += 1;
                let inner = self.parse_binary_chain();
                if self.peek() == Some(b')') {
                    self.pos += 1;
                    inner
                } else {
                    self.abort()
                }
            }
            b'$' => {
                self.pos += 1;
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
                {
                    self.pos += 1;
                }
                let name =
                    std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default();
                Expr::Var(self.ctx.variable_slot(name))
            }
            b'!' => {
                self.pos += 1;
                Expr::Not(Box::new(self.parse_atom()))
            }
            _ => self.abort(),
        }
    }

    /// Decimal literal. Clamped at `i32::MAX` while consuming all digits.
    fn parse_number(&mut self) -> Expr {
        let mut value: i64 = 0;
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            value = (value * 10 + i64::from(ch - b'0')).min(i64::from(i32::MAX));
            self.pos += 1;
        }
        #[allow(clippy::cast_possible_truncation)]
        Expr::Const(value as i32)
    }
}
