use drvreg_derive::drvreg_error;
use std::borrow::Cow;

#[drvreg_error]
pub enum ScanError {
    #[error("I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Unknown entry{}: {name}", format_context(.context))]
    Unknown { name: String, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {}
