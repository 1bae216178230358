use std::fmt;

/// Closed set of failure categories, each with a stable exception-type
/// token that always leads the formatted diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Name,
    Type,
    ZeroDivision,
    /// Anything the engine cannot classify.
    Other,
}

impl ErrorKind {
    pub fn token(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Name => "NameError",
            ErrorKind::Type => "TypeError",
            ErrorKind::ZeroDivision => "ZeroDivisionError",
            ErrorKind::Other => "Unknown exception type",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A structured evaluation failure: category, detail, and the
/// statement trace accumulated while unwinding out of a snippet.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{kind}: {message}")]
pub struct EvalError {
    pub kind: ErrorKind,
    pub message: String,
    pub trace: Vec<String>,
}

impl EvalError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        EvalError {
            kind,
            message: message.into(),
            trace: Vec::new(),
        }
    }

    pub fn syntax(message: impl Into<String>, line: usize, col: usize) -> Self {
        let message = message.into();
        EvalError::new(ErrorKind::Syntax, format!("{message} at line {line}, col {col}"))
    }

    pub(crate) fn with_frame(mut self, frame: String) -> Self {
        self.trace.push(frame);
        self
    }

    /// Format the failure as one human-readable diagnostic:
    /// `type: message: trace`. Each part falls back to a sentinel
    /// when it cannot be rendered, so the result is never empty and
    /// always carries the type token.
    pub fn diagnostic(&self) -> String {
        let mut out = String::from(self.kind.token());

        out.push_str(": ");
        if self.message.trim().is_empty() {
            out.push_str("Unparseable error detail");
        } else {
            out.push_str(self.message.trim());
        }

        if !self.trace.is_empty() {
            out.push_str(": ");
            let rendered: Vec<&str> = self
                .trace
                .iter()
                .map(|frame| {
                    let frame = frame.trim();
                    if frame.is_empty() {
                        "Unparseable trace line"
                    } else {
                        frame
                    }
                })
                .collect();
            out.push_str(&rendered.join("\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_leads_with_type_token() {
        let err = EvalError::new(ErrorKind::Name, "name 'x' is not defined");
        assert_eq!(err.diagnostic(), "NameError: name 'x' is not defined");
    }

    #[test]
    fn diagnostic_appends_trace_frames() {
        let err = EvalError::new(ErrorKind::ZeroDivision, "division by zero")
            .with_frame("statement 2: b = 1 / 0".to_string());
        assert_eq!(
            err.diagnostic(),
            "ZeroDivisionError: division by zero: statement 2: b = 1 / 0"
        );
    }

    #[test]
    fn diagnostic_falls_back_per_part() {
        let err = EvalError::new(ErrorKind::Other, "  ").with_frame("   ".to_string());
        assert_eq!(
            err.diagnostic(),
            "Unknown exception type: Unparseable error detail: Unparseable trace line"
        );
    }

    #[test]
    fn diagnostic_is_never_empty() {
        for kind in [
            ErrorKind::Syntax,
            ErrorKind::Name,
            ErrorKind::Type,
            ErrorKind::ZeroDivision,
            ErrorKind::Other,
        ] {
            let err = EvalError::new(kind, "");
            assert!(!err.diagnostic().is_empty());
            assert!(err.diagnostic().contains(kind.token()));
        }
    }
}
