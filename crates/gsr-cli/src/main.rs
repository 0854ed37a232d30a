//! GSR command line: record gesture samples, train and run a classifier

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gsr_core::HandlerHandle;
use gsr_pipeline::{
    train_model, BatchSampleManager, CentroidModel, ClassifierKind, ClassifierReceiver,
    FileSampleReceiver,
};
use gsr_serial::{available_ports, DataReader, SerialConfig, SerialDataReader};
use gsr_simulation::{DeviceConfig, GestureDeviceSimulator};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "gsr", about = "Gesture sample recording and recognition")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record samples from the device and save them to a dataset
    Record {
        /// Serial port name, e.g. /dev/ttyUSB0 or COM6
        #[arg(short, long)]
        port: String,
        /// Dataset directory where samples are saved
        #[arg(short, long, default_value = "dataset")]
        dir: PathBuf,
        /// Gesture label applied to the recorded samples
        #[arg(short, long, default_value = "SAMPLE")]
        gesture: String,
        /// Number of sensor axes in the signal
        #[arg(short, long, default_value_t = 6)]
        axis: usize,
        /// Baud rate of the device link
        #[arg(short, long, default_value_t = 38_400)]
        baud: u32,
    },
    /// List the available serial ports
    Ports,
    /// Train a classifier model from a dataset
    Train {
        /// Dataset directory where samples are saved
        #[arg(short, long, default_value = "dataset")]
        dir: PathBuf,
        /// Classifier kind used to create the model
        #[arg(short, long, default_value = "centroid")]
        classifier: String,
        /// Number of sensor axes in the signal
        #[arg(short, long, default_value_t = 6)]
        axis: usize,
        /// Where to write the trained model
        output: PathBuf,
    },
    /// Classify live gestures with a trained model
    Predict {
        /// Serial port name, e.g. /dev/ttyUSB0 or COM6
        #[arg(short, long)]
        port: String,
        /// Number of sensor axes in the signal
        #[arg(short, long, default_value_t = 6)]
        axis: usize,
        /// Baud rate of the device link
        #[arg(short, long, default_value_t = 38_400)]
        baud: u32,
        /// Path of the trained model
        model: PathBuf,
    },
    /// Record samples from the simulated device instead of hardware
    Simulate {
        /// Dataset directory where samples are saved
        #[arg(short, long, default_value = "dataset")]
        dir: PathBuf,
        /// Gesture label applied to the recorded samples
        #[arg(short, long, default_value = "SAMPLE")]
        gesture: String,
        /// Number of batches to generate
        #[arg(short, long, default_value_t = 3)]
        batches: usize,
        /// Seed for a reproducible session
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    match Cli::parse().command {
        Command::Record {
            port,
            dir,
            gesture,
            axis,
            baud,
        } => record(&port, dir, &gesture, axis, baud),
        Command::Ports => ports(),
        Command::Train {
            dir,
            classifier,
            axis,
            output,
        } => train(&dir, &classifier, axis, &output),
        Command::Predict {
            port,
            axis,
            baud,
            model,
        } => predict(&port, axis, baud, &model),
        Command::Simulate {
            dir,
            gesture,
            batches,
            seed,
        } => simulate(dir, &gesture, batches, seed),
    }
}

/// Acquire from the device into a labeled dataset until Ctrl+C
fn record(port: &str, dir: PathBuf, gesture: &str, axis: usize, baud: u32) -> Result<()> {
    let mut manager = BatchSampleManager::with_gesture(axis, gesture);
    manager.attach_receiver(Arc::new(Mutex::new(FileSampleReceiver::new(dir))));

    println!("Recording '{}' samples, press Ctrl+C to stop", gesture);
    run_until_interrupted(serial_reader(port, axis, baud), Arc::new(Mutex::new(manager)))
}

/// Acquire from the device and classify each finished sample until Ctrl+C
fn predict(port: &str, axis: usize, baud: u32, model_path: &PathBuf) -> Result<()> {
    let model = CentroidModel::load(model_path)?;
    let mut manager = BatchSampleManager::new(axis);
    manager.attach_receiver(Arc::new(Mutex::new(ClassifierReceiver::new(model))));

    println!("Classifying live gestures, press Ctrl+C to stop");
    run_until_interrupted(serial_reader(port, axis, baud), Arc::new(Mutex::new(manager)))
}

fn serial_reader(port: &str, axis: usize, baud: u32) -> SerialDataReader {
    SerialDataReader::new(SerialConfig {
        port_name: port.to_string(),
        baud_rate: baud,
        expected_axis: axis,
        ..SerialConfig::default()
    })
}

/// Drive the blocking acquisition loop on a worker thread and stop it
/// cleanly when the operator presses Ctrl+C.
fn run_until_interrupted(mut reader: SerialDataReader, handler: HandlerHandle) -> Result<()> {
    reader.attach_manager(handler);
    reader.open()?;
    let token = reader.cancel_token();

    let runtime = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    let (mut reader, run_result) = runtime.block_on(async move {
        let mut task = tokio::task::spawn_blocking(move || {
            let result = reader.run();
            (reader, result)
        });

        let joined = tokio::select! {
            joined = &mut task => Some(joined),
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "interrupt handler failed, stopping");
                }
                info!("stop requested, finishing current line");
                token.cancel();
                None
            }
        };
        match joined {
            Some(joined) => joined,
            None => task.await,
        }
    })?;

    reader.close()?;
    run_result?;
    info!("acquisition finished");
    Ok(())
}

/// Print all available serial ports
fn ports() -> Result<()> {
    let ports = available_ports()?;
    if ports.is_empty() {
        println!("No serial ports found");
    }
    for port in ports {
        println!("{}", port);
    }
    Ok(())
}

/// Train a model from a dataset directory
fn train(dir: &PathBuf, classifier: &str, axis: usize, output: &PathBuf) -> Result<()> {
    let kind: ClassifierKind = classifier.parse()?;
    let model = train_model(dir, kind, axis, output)?;

    println!(
        "Trained {} gesture(s) into {}",
        model.centroids.len(),
        output.display()
    );
    for centroid in &model.centroids {
        println!("  {}", centroid.gesture);
    }
    Ok(())
}

/// Record a session from the simulated device
fn simulate(dir: PathBuf, gesture: &str, batches: usize, seed: Option<u64>) -> Result<()> {
    let simulator = GestureDeviceSimulator::new(DeviceConfig {
        batches,
        seed,
        ..DeviceConfig::default()
    });
    let axis = simulator.config().axis;

    let mut manager = BatchSampleManager::with_gesture(axis, gesture);
    manager.attach_receiver(Arc::new(Mutex::new(FileSampleReceiver::new(dir))));
    let handler: HandlerHandle = Arc::new(Mutex::new(manager));

    let mut reader = simulator.into_reader();
    reader.attach_manager(handler);
    reader.open()?;
    reader.run()?;
    reader.close()?;

    println!("Simulated {} batch(es) of gesture '{}'", batches, gesture);
    Ok(())
}
