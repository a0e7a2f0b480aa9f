// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Byte transports carrying request and reply frames

use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use bq_protocol::{read_message, write_message, ProtocolError};

use crate::config::ServerAddress;

/// A blocking, framed, bidirectional channel to one server.
///
/// Implementations own their socket (or test double). Only one thread uses a
/// transport at a time: the connection lock serializes access.
pub trait Transport: Send {
    /// Write one frame and flush it to the peer.
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), ProtocolError>;

    /// Block until one complete frame has been read.
    fn read_frame(&mut self) -> Result<Vec<u8>, ProtocolError>;

    /// Close the channel. Further reads and writes fail.
    fn shutdown(&mut self) {}
}

/// TCP transport with buffered reader and writer halves
pub struct TcpTransport {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl TcpTransport {
    /// Open a TCP connection to `address`, trying each resolved socket address.
    pub fn connect(
        address: &ServerAddress,
        connect_timeout: Duration,
        io_timeout: Option<Duration>,
    ) -> Result<Self, ProtocolError> {
        let mut last_err = None;
        for addr in (address.host.as_str(), address.port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, connect_timeout) {
                Ok(stream) => return Self::from_stream(stream, io_timeout),
                Err(e) => {
                    tracing::debug!(%addr, error = %e, "connect attempt failed");
                    last_err = Some(e);
                }
            }
        }
        Err(match last_err {
            Some(e) => ProtocolError::Io(e),
            None => ProtocolError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no addresses for {}", address),
            )),
        })
    }

    /// Wrap an already connected stream
    pub fn from_stream(
        stream: TcpStream,
        io_timeout: Option<Duration>,
    ) -> Result<Self, ProtocolError> {
        stream.set_nodelay(true)?;
        stream.set_read_timeout(io_timeout)?;
        stream.set_write_timeout(io_timeout)?;
        let reader = BufReader::new(stream.try_clone()?);
        Ok(Self {
            reader,
            writer: BufWriter::new(stream),
        })
    }
}

impl Transport for TcpTransport {
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), ProtocolError> {
        write_message(&mut self.writer, frame)
    }

    fn read_frame(&mut self) -> Result<Vec<u8>, ProtocolError> {
        read_message(&mut self.reader)
    }

    fn shutdown(&mut self) {
        let _ = self.writer.get_ref().shutdown(Shutdown::Both);
    }
}
