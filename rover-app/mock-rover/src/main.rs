use clap::{Parser, Subcommand};
use embassy_time::Delay;
use rover_core::utils::{
    controllers::{
        ActuatorBank, Buzzer, Direction, MotorDriver, MotorPort, RoverController, Thermometer,
    },
    Command, Radio, RoverConfig, RoverId, Verb,
};
use smart_leds_trait::{SmartLedsWrite, RGB8};
use std::{
    convert::Infallible,
    io,
    net::{SocketAddr, UdpSocket},
    path::PathBuf,
    process::ExitCode,
};
use tracing::{debug, error, info, warn};

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts
{
    #[clap(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd
{
    /// Run the rover loop with a UDP socket standing in for the LoRa radio
    Run {
        /// Address the simulated radio listens on
        #[clap(long, default_value = "127.0.0.1:4000")]
        bind: SocketAddr,
        /// Where telemetry goes; defaults to the sender of the last packet
        #[clap(long)]
        gateway: Option<SocketAddr>,
        /// Rover identity, overrides the config file
        #[clap(long)]
        rover_id: Option<String>,
        /// JSON file with `RoverConfig` overrides
        #[clap(long)]
        config: Option<PathBuf>,
        /// Broadcast temperature after every packet
        #[clap(long)]
        telemetry: bool,
        /// Reading reported by the simulated sensor
        #[clap(long, default_value_t = 21.0)]
        temperature: f32,
    },
    /// Send one command packet to a rover
    Send {
        #[clap(long, default_value = "127.0.0.1:4000")]
        to: SocketAddr,
        rover_id: String,
        #[clap(value_parser = parse_verb)]
        verb: Verb,
    },
}

fn parse_verb(s: &str) -> Result<Verb, String> {
    s.parse::<Verb>().map_err(|_| format!("unknown verb `{s}`"))
}

/// One UDP datagram per LoRa packet.
struct UdpRadio {
    socket: UdpSocket,
    gateway: Option<SocketAddr>,
    last_peer: Option<SocketAddr>,
}

impl Radio for UdpRadio {
    type Error = io::Error;

    fn initialise_pins(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        info!("radio reset");
        Ok(())
    }

    fn initialise(&mut self) -> Result<(), Self::Error> {
        let addr = self.socket.local_addr()?;
        info!(%addr, "radio listening");
        Ok(())
    }

    fn set_frequency(&mut self, hz: u32) -> Result<(), Self::Error> {
        info!(mhz = hz as f32 / 1e6, "radio frequency");
        Ok(())
    }

    fn set_power(&mut self, dbm: i8) -> Result<(), Self::Error> {
        info!(dbm, "radio power");
        Ok(())
    }

    fn transmit(&mut self, payload: &[u8]) -> Result<(), Self::Error> {
        match self.gateway.or(self.last_peer) {
            Some(peer) => {
                self.socket.send_to(payload, peer)?;
                info!(%peer, payload = ?String::from_utf8_lossy(payload), "TX");
            }
            None => warn!(len = payload.len(), "no gateway known, dropping packet"),
        }
        Ok(())
    }

    fn blocking_receive(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let (len, peer) = self.socket.recv_from(buf)?;
        self.last_peer = Some(peer);
        debug!(%peer, payload = ?String::from_utf8_lossy(&buf[..len]), "RX");
        Ok(len)
    }
}

/// Motor driver that logs to console
struct ConsoleMotors;

impl MotorDriver for ConsoleMotors {
    type Error = Infallible;

    fn begin(&mut self) -> Result<(), Self::Error> {
        info!("motor shield found");
        Ok(())
    }

    fn set_speed(&mut self, port: MotorPort, speed: u8) -> Result<(), Self::Error> {
        debug!(?port, speed, "set speed");
        Ok(())
    }

    fn run(&mut self, port: MotorPort, direction: Direction) -> Result<(), Self::Error> {
        info!(?port, ?direction, "run");
        Ok(())
    }
}

/// LED driver that logs to console
struct ConsoleLedDriver;

impl SmartLedsWrite for ConsoleLedDriver {
    type Color = RGB8;
    type Error = Infallible;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        for c in iterator {
            let c: RGB8 = c.into();
            info!(r = c.r, g = c.g, b = c.b, "LED");
        }
        Ok(())
    }
}

struct ConsoleBuzzer;

impl Buzzer for ConsoleBuzzer {
    type Error = Infallible;

    fn tone(&mut self, hz: u32) -> Result<(), Self::Error> {
        info!(hz, "buzzer on");
        Ok(())
    }

    fn silence(&mut self) -> Result<(), Self::Error> {
        info!("buzzer off");
        Ok(())
    }
}

struct FixedThermometer(f32);

impl Thermometer for FixedThermometer {
    type Error = Infallible;

    fn begin(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn read_celsius(&mut self) -> Result<f32, Self::Error> {
        Ok(self.0)
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<RoverConfig, String> {
    let Some(path) = path else {
        return Ok(RoverConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("reading {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("parsing {}: {e}", path.display()))
}

fn run_rover(
    bind: SocketAddr,
    gateway: Option<SocketAddr>,
    rover_id: Option<String>,
    config: Option<PathBuf>,
    telemetry: bool,
    temperature: f32,
) -> Result<(), String> {
    let mut config = load_config(config.as_ref())?;
    if let Some(id) = rover_id {
        config.rover_id =
            RoverId::new(&id).ok_or_else(|| format!("invalid rover id `{id}`"))?;
    }
    config.telemetry |= telemetry;

    let socket = UdpSocket::bind(bind).map_err(|e| format!("binding {bind}: {e}"))?;
    let radio = UdpRadio {
        socket,
        gateway,
        last_peer: None,
    };
    let bank = ActuatorBank::new(
        ConsoleMotors,
        ConsoleLedDriver,
        ConsoleBuzzer,
        FixedThermometer(temperature),
        Delay,
    );

    info!(rover_id = %config.rover_id, "Starting rover");
    let mut rover = RoverController::new(radio, bank, config);
    rover.run()
}

fn send_command(to: SocketAddr, rover_id: &str, verb: Verb) -> Result<(), String> {
    let socket = UdpSocket::bind("0.0.0.0:0").map_err(|e| e.to_string())?;
    let packet = Command::new(rover_id, verb).to_string();
    socket
        .send_to(packet.as_bytes(), to)
        .map_err(|e| format!("sending to {to}: {e}"))?;
    info!(%to, ?packet, "sent");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts: Opts = Opts::parse();
    let result = match opts.command {
        Cmd::Run {
            bind,
            gateway,
            rover_id,
            config,
            telemetry,
            temperature,
        } => run_rover(bind, gateway, rover_id, config, telemetry, temperature),
        Cmd::Send { to, rover_id, verb } => send_command(to, &rover_id, verb),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "mock-rover failed");
            ExitCode::FAILURE
        }
    }
}
