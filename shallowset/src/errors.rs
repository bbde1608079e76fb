/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This software may be used and distributed according to the terms of the
 * GNU General Public License version 2.
 */

use std::io;

use thiserror::Error;
use types::HexError;

#[derive(Debug, Error)]
pub enum ShallowError {
    /// A line in the shallow file is not a well-formed commit id. The
    /// file is left untouched; nothing is guessed or dropped.
    #[error("corrupt entry in shallow file: {line}")]
    CorruptEntry {
        line: String,
        #[source]
        source: HexError,
    },

    /// The underlying read, write, rename or remove failed. The
    /// previously persisted state remains authoritative.
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ShallowError>;
