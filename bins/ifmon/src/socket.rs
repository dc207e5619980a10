//! Async notification socket for the host platform.

use std::io;
use std::os::fd::AsRawFd;

use bytes::BytesMut;
use ifwatch::FilterConfig;
use tokio::io::Interest;
use tokio::io::unix::AsyncFd;

/// Large enough for a full rtnetlink batch; kernel events are far smaller.
const RECV_BUF_SIZE: usize = 32768;

#[cfg(target_os = "linux")]
type Inner = netlink_sys::Socket;

#[cfg(target_vendor = "apple")]
type Inner = std::os::fd::OwnedFd;

/// Notification socket with its subscription filter installed.
pub struct EventSocket {
    fd: AsyncFd<Inner>,
}

impl EventSocket {
    /// Open the platform notification socket and apply `filter`.
    pub fn open(filter: &FilterConfig) -> anyhow::Result<Self> {
        let socket = open_inner()?;
        ifwatch::configure_filter(socket.as_raw_fd(), filter)?;
        let fd = AsyncFd::new(socket)?;
        Ok(Self { fd })
    }

    /// Receive one datagram.
    pub async fn recv(&self) -> io::Result<BytesMut> {
        let mut buf = BytesMut::with_capacity(RECV_BUF_SIZE);

        loop {
            let mut guard = self.fd.ready(Interest::READABLE).await?;

            match guard.try_io(|inner| recv_into(inner.get_ref(), &mut buf)) {
                Ok(result) => {
                    result?;
                    return Ok(buf);
                }
                Err(_would_block) => continue,
            }
        }
    }
}

#[cfg(target_os = "linux")]
fn open_inner() -> io::Result<Inner> {
    let mut socket = netlink_sys::Socket::new(netlink_sys::protocols::NETLINK_ROUTE)?;
    socket.set_non_blocking(true)?;
    Ok(socket)
}

#[cfg(target_os = "linux")]
fn recv_into(socket: &Inner, buf: &mut BytesMut) -> io::Result<usize> {
    socket.recv(buf, 0)
}

#[cfg(target_vendor = "apple")]
mod darwin {
    pub const PF_SYSTEM: libc::c_int = 32;
    pub const SYSPROTO_EVENT: libc::c_int = 1;
}

#[cfg(target_vendor = "apple")]
fn open_inner() -> io::Result<Inner> {
    use std::os::fd::FromRawFd;

    // SAFETY: plain socket(2) call; the result is checked before use.
    let fd = unsafe { libc::socket(darwin::PF_SYSTEM, libc::SOCK_RAW, darwin::SYSPROTO_EVENT) };
    if fd < 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: fd was just returned by socket(2) and is owned by nobody else.
    let socket = unsafe { Inner::from_raw_fd(fd) };

    // SAFETY: fcntl on a descriptor we own.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 || unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(socket)
}

#[cfg(target_vendor = "apple")]
fn recv_into(socket: &Inner, buf: &mut BytesMut) -> io::Result<usize> {
    use bytes::BufMut;

    let dst = buf.chunk_mut();
    // SAFETY: dst is writable spare capacity of dst.len() bytes.
    let n = unsafe {
        libc::recv(
            socket.as_raw_fd(),
            dst.as_mut_ptr().cast::<libc::c_void>(),
            dst.len(),
            0,
        )
    };
    if n < 0 {
        return Err(io::Error::last_os_error());
    }
    let n = n as usize;
    // SAFETY: recv initialized the first n bytes of the spare capacity.
    unsafe { buf.advance_mut(n) };
    Ok(n)
}
