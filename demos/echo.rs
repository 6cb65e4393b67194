//! Websocket echo server.
//!
//! ```text
//! cargo run --example echo -- 127.0.0.1:8080
//! ```

use std::env;
use std::io;
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use log::{info, warn};

use wsupgrade::handshake::{HttpHeader, Request};
use wsupgrade::http::read_request;
use wsupgrade::{Config, Error, Logger, Negotiator};

fn serve(tcp: TcpStream, negotiator: &Negotiator) -> Result<(), Error> {
    let mut buf = vec![0u8; 4096];
    let mut headers = HttpHeader::new_storage();
    let mut request = Request::new(&mut headers);

    let mut w = read_request(tcp, &mut buf, &mut request)?;
    let mut conn = negotiator.negotiate(&request, &mut w)?;

    loop {
        let message = match conn.receive() {
            Ok(message) => message,
            Err(e) if e.is_closed() => break,
            Err(e) => {
                let _ = conn.close();
                return Err(e);
            }
        };
        conn.send(&message)?;
    }
    conn.close()?;
    Ok(())
}

fn main() -> io::Result<()> {
    env_logger::init();

    let addr = env::args().nth(1).unwrap_or_else(|| "127.0.0.1:8080".to_string());
    let lis = TcpListener::bind(&addr)?;
    info!("listen on {}", addr);

    let config = Config::new().io_timeout(Some(Duration::from_secs(60)));
    let negotiator = Negotiator::new(config, Logger::global());

    for tcp in lis.incoming() {
        let tcp = tcp?;
        let negotiator = negotiator.clone();
        thread::spawn(move || {
            if let Err(e) = serve(tcp, &negotiator) {
                warn!("connection: {}", e);
            }
        });
    }
    Ok(())
}
