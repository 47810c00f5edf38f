//! The sub-process Transport.
//!
//! `spec.md` §6 lists three connection constructors: Plain, TLS, and
//! Stream (`command` — launches a sub-process, reads its stdout,
//! writes its stdin). The first two are [`crate::connection::stream::ImapStream`];
//! this module supplies the third, in the same manual `poll_read`/
//! `poll_write` style as that type.

use std::io;
use std::pin::Pin;
use std::process::Stdio;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use crate::{Error, Result};

/// A Transport backed by a child process's stdio, for IMAP servers
/// reached through a local command (e.g. an SSH tunnel or a local
/// delivery agent) rather than a direct socket.
pub struct ProcessTransport {
    child: Child,
    stdin: ChildStdin,
    stdout: ChildStdout,
}

impl ProcessTransport {
    /// Spawns `command` (interpreted by the shell, as an IMAP `Stream`
    /// constructor's `command` argument is conventionally a shell
    /// command line) and wires its stdio as the Transport.
    pub fn spawn(command: &str) -> Result<Self> {
        let mut child = Command::new("/bin/sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let stdin = child.stdin.take().ok_or_else(|| Error::Protocol("child has no stdin".to_string()))?;
        let stdout = child.stdout.take().ok_or_else(|| Error::Protocol("child has no stdout".to_string()))?;
        Ok(Self { child, stdin, stdout })
    }

    /// Waits for the child process to exit, after the connection is
    /// logically closed.
    pub async fn shutdown(mut self) -> Result<()> {
        drop(self.stdin);
        self.child.wait().await?;
        Ok(())
    }
}

impl AsyncRead for ProcessTransport {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stdout).poll_read(cx, buf)
    }
}

impl AsyncWrite for ProcessTransport {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().stdin).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stdin).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stdin).poll_shutdown(cx)
    }
}
