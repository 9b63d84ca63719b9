pub mod html;
pub mod literal;

pub use html::{find_script_blocks, ScriptBlock};
pub use literal::{
    locate_literal, parse_literal, repair_literal, LiteralError, LiteralResult,
    DEFAULT_BRACE_ORDINAL,
};
