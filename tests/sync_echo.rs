use std::net::{TcpStream, TcpListener};
use std::thread;

use wsupgrade::codec;
use wsupgrade::error::{Error, ClosedBy};
use wsupgrade::frame::OpCode;
use wsupgrade::handshake::{HttpHeader, Request};
use wsupgrade::http::read_request;
use wsupgrade::{Config, Logger, Negotiator};

use log::debug;

mod common;
use common::*;

const ECHO_DATA: &[u8] = b"ECHO ECHO ECHO!";

macro_rules! gets {
    ($b: expr) => {
        std::str::from_utf8($b).unwrap()
    };
}

#[test]
fn sync_echo() {
    let _ = env_logger::try_init();

    let lis = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = lis.local_addr().unwrap();

    let t1 = thread::spawn(move || {
        let mut buf = vec![0u8; 1024];
        let (tcp, _) = lis.accept().unwrap();
        debug!("server: tcp accepted!");

        let mut headers = HttpHeader::new_storage();
        let mut request = Request::new(&mut headers);
        let mut w = read_request(tcp, &mut buf, &mut request).unwrap();
        assert_eq!(request.path, PATH.as_bytes());

        let negotiator = Negotiator::new(Config::new(), Logger::global());
        let mut ws = negotiator.negotiate(&request, &mut w).unwrap();
        debug!("server: websocket accepted!");

        let mut count = 0;
        loop {
            let message = match ws.receive() {
                Ok(message) => message,
                Err(e) => {
                    debug!("server: {}", e);
                    assert!(matches!(e, Error::Closed(ClosedBy::Peer)));
                    break;
                }
            };
            debug!("server: echo..");
            ws.send(&message).unwrap();
            count += 1;
        }
        ws.close().unwrap();
        count
    });

    let t2 = thread::spawn(move || {
        let mut tcp = TcpStream::connect(addr).unwrap();
        debug!("client: tcp connected!");

        let (head, sec_accept) = send_upgrade(&mut tcp, b"");
        debug!("client: receive response: {}", gets!(&head));

        let mut headers = [httparse::EMPTY_HEADER; 8];
        let mut response = httparse::Response::new(&mut headers);
        assert!(response.parse(&head).unwrap().is_complete());
        assert_eq!(response.code, Some(101));
        let accept = response
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case("sec-websocket-accept"))
            .unwrap();
        assert_eq!(accept.value, &sec_accept[..]);
        debug!("client: websocket connected!");

        let config = Config::new();
        for i in 1..=5 {
            debug!("client: send[{}]..", i);
            std::io::Write::write_all(&mut tcp, &client_frame(OpCode::Text, ECHO_DATA)).unwrap();

            let frame = codec::decode(&mut tcp, &config).unwrap();
            debug!("client: receive message: {}", gets!(&frame.payload));
            assert_eq!(frame.payload, ECHO_DATA);
        }

        // large payload, 64-bit length
        let data: Vec<u8> = (0..70000).map(|i| b'a' + (i % 26) as u8).collect();
        std::io::Write::write_all(&mut tcp, &client_frame(OpCode::Text, &data)).unwrap();
        let frame = codec::decode(&mut tcp, &config).unwrap();
        assert_eq!(frame.payload, data);

        debug!("client: close");
        std::io::Write::write_all(&mut tcp, &client_frame(OpCode::Close, &[0x03, 0xe8])).unwrap();
    });

    t2.join().unwrap();
    assert_eq!(t1.join().unwrap(), 6);
}
