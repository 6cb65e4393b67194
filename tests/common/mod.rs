#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpStream;

use wsupgrade::codec;
use wsupgrade::frame::{OpCode, Mask};
use wsupgrade::frame::mask::new_rand_key;
use wsupgrade::handshake::{new_sec_key, derive_accept_key};

pub const HOST: &str = "www.example.com";
pub const PATH: &str = "/echo";

/// Send an upgrade request, return the raw response head.
pub fn send_upgrade(tcp: &mut TcpStream, extra: &[u8]) -> (Vec<u8>, [u8; 28]) {
    let sec_key = new_sec_key();
    let request = format!(
        "GET {} HTTP/1.1\r\n\
        Host: {}\r\n\
        Upgrade: websocket\r\n\
        Connection: Upgrade\r\n\
        Sec-WebSocket-Key: {}\r\n\
        Sec-WebSocket-Version: 13\r\n\r\n",
        PATH,
        HOST,
        std::str::from_utf8(&sec_key).unwrap(),
    );
    let mut request = request.into_bytes();
    request.extend_from_slice(extra);
    tcp.write_all(&request).unwrap();
    (read_head(tcp), derive_accept_key(&sec_key))
}

/// Read until an empty line, byte by byte, so that no frame is consumed.
pub fn read_head(tcp: &mut TcpStream) -> Vec<u8> {
    let mut head = Vec::new();
    let mut b = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        match tcp.read(&mut b) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        head.push(b[0]);
    }
    head
}

/// Frame sent by a client, masked with a random key.
pub fn client_frame(opcode: OpCode, data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    codec::encode_to(&mut buf, opcode, Mask::Key(new_rand_key()), data);
    buf
}
