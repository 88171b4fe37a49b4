//! The `ast` command: print the lowered tree.

use std::path::Path;

use flo_ir::{pretty_print, StringInterner};

use super::load_module;
use crate::CommandError;

pub fn ast_file(path: &Path) -> Result<String, CommandError> {
    let interner = StringInterner::new();
    let module = load_module(path, &interner)?;
    Ok(pretty_print(&module, &interner))
}
