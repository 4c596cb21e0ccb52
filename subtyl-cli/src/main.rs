#![forbid(unsafe_code)]

//! Runs one SubtylSocket handshake end to end over an in-process transport
//! and reports whether both sides derived matching keys.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use subtyl_core::{AeadChannel, HandshakeConfig, HandshakeStatus, Initiator, Responder};
use subtyl_transport::{ChannelTransport, Transport};

#[derive(Parser)]
#[command(name = "subtyl-cli", about = "SubtylSocket handshake demo")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a loopback handshake and one AEAD round trip, printing the result.
    Demo {
        /// Message to encrypt once the session is confirmed.
        #[arg(long, default_value = "hello from the initiator")]
        message: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Demo { message } => run_demo(&message),
    }
}

fn run_demo(message: &str) -> Result<()> {
    let (mut initiator_transport, mut responder_transport) = ChannelTransport::pair();
    let mut initiator = Initiator::new(HandshakeConfig::default())
        .context("failed to allocate the initiator's session id")?;
    let mut responder = Responder::new(HandshakeConfig::default());

    info!("initiator starting handshake");
    let event = initiator.start();
    send(&mut initiator_transport, event.outbound.as_ref())?;

    let init_msg = responder_transport
        .recv()
        .context("responder never received handshake-init")?;
    let event = responder.handle(&init_msg);
    send(&mut responder_transport, event.outbound.as_ref())?;

    let resp_msg = initiator_transport
        .recv()
        .context("initiator never received handshake-response")?;
    let event = initiator.handle(&resp_msg);
    send(&mut initiator_transport, event.outbound.as_ref())?;

    let req_msg = responder_transport
        .recv()
        .context("responder never received key-confirmation-request")?;
    let event = responder.handle(&req_msg);
    send(&mut responder_transport, event.outbound.as_ref())?;
    if event.status != HandshakeStatus::Confirmed {
        bail!("responder failed to confirm: {:?}", event.error);
    }

    let conf_msg = initiator_transport
        .recv()
        .context("initiator never received key-confirmation")?;
    let event = initiator.handle(&conf_msg);
    if event.status != HandshakeStatus::Confirmed {
        bail!("initiator failed to confirm: {:?}", event.error);
    }

    let i_keys = initiator.derived_keys().expect("initiator is confirmed");
    let r_keys = responder.derived_keys().expect("responder is confirmed");
    if i_keys.encryption != r_keys.encryption || i_keys.authentication != r_keys.authentication {
        bail!("derived keys disagree between initiator and responder");
    }
    println!("handshake confirmed; encryption and authentication keys agree");

    let channel = AeadChannel::new(i_keys);
    let envelope = channel.encrypt(message.as_bytes())?;
    let round_tripped = channel.decrypt(&envelope)?;
    println!(
        "encrypted {:?} and decrypted back to {:?}",
        message,
        String::from_utf8_lossy(&round_tripped)
    );

    Ok(())
}

fn send(
    transport: &mut ChannelTransport,
    message: Option<&subtyl_core::WireMessage>,
) -> Result<()> {
    if let Some(message) = message {
        transport
            .send(message)
            .context("transport rejected an outbound message")?;
    }
    Ok(())
}
