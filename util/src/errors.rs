/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This software may be used and distributed according to the terms of the
 * GNU General Public License version 2.
 */

use std::io;
use std::path::Path;

/// An `io::Error` wrapped with a human readable message. The original
/// error kind is preserved so callers can still match on it.
#[derive(Debug, thiserror::Error)]
#[error("{msg}: {source}")]
pub(crate) struct IOErrorContext {
    msg: String,
    source: io::Error,
}

pub fn from_err_msg(source: io::Error, msg: String) -> io::Error {
    let kind = source.kind();
    let error = IOErrorContext { msg, source };
    io::Error::new(kind, error)
}

pub fn from_err_msg_path(err: io::Error, msg: impl AsRef<str>, path: impl AsRef<Path>) -> io::Error {
    let msg = format!("{}: '{}'", msg.as_ref(), path.as_ref().display());
    from_err_msg(err, msg)
}

pub trait IOContext<T> {
    fn io_context(self, msg: impl FnOnce() -> String) -> io::Result<T>;

    fn path_context(self, msg: impl AsRef<str>, path: impl AsRef<Path>) -> io::Result<T>
    where
        Self: Sized,
    {
        self.io_context(|| format!("{}: '{}'", msg.as_ref(), path.as_ref().display()))
    }
}

impl<T> IOContext<T> for io::Result<T> {
    fn io_context(self, msg: impl FnOnce() -> String) -> io::Result<T> {
        self.map_err(|err| from_err_msg(err, msg()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context() {
        let res: io::Result<()> = Err(io::Error::from(io::ErrorKind::AlreadyExists));
        let path: &Path = "/tmp/foo".as_ref();

        let res: io::Result<()> = res.path_context("error opening file", path);

        // Can wrap further with more context.
        let res = res.io_context(|| "processing response".to_string());

        let err = res.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(
            format!("{}", err),
            "processing response: error opening file: '/tmp/foo': entity already exists"
        );
    }
}
