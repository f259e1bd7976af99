// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! URL & parameter parsing

mod parser;

pub use parser::{parse_hash, parse_params, ParameterSet};
pub(crate) use parser::resolve;
