use std::time::Duration;

use anyhow::{anyhow, Context};
use driver::Mpu6050;
use env_logger::Env;
use hal::StdClock;
use log::info;

use board::SitlBoard;
use sim::{SimState, SimulatedMpu6050};
mod board;
mod sim;
mod util;

/// Readings printed before and after the reset
const READINGS: usize = 30;
const READ_INTERVAL: Duration = Duration::from_millis(200);
/// Yaw rate the simulated board spins at once calibration is done
const DEMO_YAW_RATE: f32 = 15.0;

type SitlImu = Mpu6050<SimulatedMpu6050, StdClock>;

fn print_theta(imu: &mut SitlImu) -> anyhow::Result<()> {
    for _ in 0..READINGS {
        let theta = imu.get_theta().context("failed to update θ")?;
        println!("{}", util::format_theta(&theta));
        std::thread::sleep(READ_INTERVAL);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let board = SitlBoard::new(SimState::new());
    info!("Board: {}", board.get_name());

    let sim_state = board.sim_state();
    let (bus, clock) = board.split_resources();
    let mut imu = Mpu6050::new(bus, clock).context("failed to initialise the MPU6050")?;

    sim_state
        .write()
        .map_err(|_| anyhow!("simulation state lock poisoned"))?
        .yaw_rate = DEMO_YAW_RATE;

    print_theta(&mut imu)?;

    imu.reset_theta();
    info!("θ reset");

    print_theta(&mut imu)?;
    Ok(())
}
