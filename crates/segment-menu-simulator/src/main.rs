//! Terminal simulator for the segment-menu one-line menu.
//!
//! Prints every frame the menu renders as a bracketed line, the way a
//! 12-digit segment display would show it. Commands are read from stdin, one
//! per line, and queued exactly like button presses on the device.
//!
//! # Commands
//!
//! | Input | Command              |
//! |-------|----------------------|
//! | n     | Next                 |
//! | p     | Previous             |
//! | e     | Enter                |
//! | c     | Cancel               |
//! | +     | Adjust (increase)    |
//! | -     | Adjust (decrease)    |
//! | h / s | Hide / show the menu |
//! | q     | Quit                 |

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::{Duration, Instant};

use log::{error, info};

use segment_menu::config::MenuDeclaration;
use segment_menu::menu::NumericValue;
use segment_menu::{
    Command, CommandQueue, Declarations, Direction, ItemId, MenuComponent, MenuItem,
    SegmentDisplay,
};

// ---------------------------------------------------------------------------
// Simulator constants
// ---------------------------------------------------------------------------

/// Poll interval of the menu
const TICK_DURATION: Duration = Duration::from_millis(300);

/// Interval between synthetic temperature readings.
const MOCK_SAMPLE_INTERVAL: Duration = Duration::from_secs(2);

const DISPLAY_ID: &str = "front_panel";
const DISPLAY_LENGTH: u8 = 12;

/// Item updated by the mock sensor, outside of the menu's own editing.
const TEMPERATURE_ITEM: ItemId = ItemId(20);

static QUEUE: CommandQueue = CommandQueue::new();
static QUIT: AtomicBool = AtomicBool::new(false);

/// Visibility requests from the stdin thread: 0 none, 1 hide, 2 show.
static VISIBILITY: AtomicU8 = AtomicU8::new(0);

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// Prints a frame whenever it differs from the previous one.
#[derive(Default)]
struct TerminalDisplay {
    last: String,
}

impl SegmentDisplay for TerminalDisplay {
    fn render(&mut self, columns: &[char]) {
        let line: String = columns.iter().collect();
        if line != self.last {
            print!("\r[{}]", line);
            io::stdout().flush().ok();
            self.last = line;
        }
    }
}

// ---------------------------------------------------------------------------
// Menu content
// ---------------------------------------------------------------------------

fn demo_items() -> Vec<MenuItem> {
    vec![
        MenuItem::action(1, "Start"),
        MenuItem::submenu(
            2,
            "Settings",
            vec![
                MenuItem::number(
                    3,
                    "Brightness",
                    NumericValue::new(4.0, 0.0, 7.0, 1.0).with_immediate_edit(),
                ),
                MenuItem::choice(4, "Mode", &["Auto", "Heat", "Cool"], 0),
                MenuItem::toggle(5, "Beep", true),
                MenuItem::submenu(
                    6,
                    "Advanced",
                    vec![
                        MenuItem::number(
                            7,
                            "Offset",
                            NumericValue::new(0.0, -2.0, 2.0, 0.1).with_precision(1),
                        ),
                        MenuItem::action(8, "Factory reset"),
                    ],
                ),
            ],
        ),
        MenuItem::number(
            TEMPERATURE_ITEM.0,
            "Temperature",
            NumericValue::new(21.0, -40.0, 85.0, 0.5).with_precision(1),
        ),
        MenuItem::label(9, "Firmware 0.1.0"),
    ]
}

/// Generates a slowly varying temperature for the external-update path.
struct MockSensorGenerator {
    elapsed_secs: f64,
}

impl MockSensorGenerator {
    fn new() -> Self {
        Self { elapsed_secs: 0.0 }
    }

    fn next_sample(&mut self, dt_secs: f64) -> f32 {
        self.elapsed_secs += dt_secs;
        let t = self.elapsed_secs;
        (21.0 + 2.0 * (t / 60.0).sin()) as f32
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "n" => Some(Command::Next),
        "p" => Some(Command::Previous),
        "e" => Some(Command::Enter),
        "c" => Some(Command::Cancel),
        "+" => Some(Command::Adjust(Direction::Increase)),
        "-" => Some(Command::Adjust(Direction::Decrease)),
        _ => None,
    }
}

fn spawn_input_thread() {
    std::thread::spawn(|| {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match line.trim() {
                "q" => break,
                "h" => VISIBILITY.store(1, Ordering::Relaxed),
                "s" => VISIBILITY.store(2, Ordering::Relaxed),
                other => match parse_command(other) {
                    Some(command) => {
                        if !QUEUE.push(command) {
                            error!("Command queue full, dropped {:?}", command);
                        }
                    }
                    None => info!("Unknown input {:?}", other),
                },
            }
        }
        QUIT.store(true, Ordering::Relaxed);
    });
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting segment-menu simulator");
    info!("Display: {} columns", DISPLAY_LENGTH);
    info!("Keys: n=Next p=Previous e=Enter c=Cancel +/-=Adjust h=Hide s=Show q=Quit");

    let mut declarations = Declarations::new();
    let menu = match declarations
        .add_display(DISPLAY_ID, Some(DISPLAY_LENGTH))
        .and_then(|_| MenuDeclaration::new("main", DISPLAY_ID, demo_items()))
    {
        Ok(menu) => menu,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    declarations.add_menu(menu);

    let resolved = match declarations.finalize() {
        Ok(mut menus) if !menus.is_empty() => menus.remove(0),
        Ok(_) => {
            error!("No menu declared");
            return;
        }
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let mut menu = MenuComponent::new(resolved, TerminalDisplay::default(), &QUEUE);
    menu.setup();
    menu.dump_config();

    spawn_input_thread();

    let mut sensor_gen = MockSensorGenerator::new();
    let mut last_sample = Instant::now();

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    while !QUIT.load(Ordering::Relaxed) {
        let tick_start = Instant::now();

        match VISIBILITY.swap(0, Ordering::Relaxed) {
            1 => menu.hide(),
            2 => menu.show(),
            _ => {}
        }

        // --- Mock sensor data ---------------------------------------------
        if last_sample.elapsed() >= MOCK_SAMPLE_INTERVAL {
            let reading = sensor_gen.next_sample(MOCK_SAMPLE_INTERVAL.as_secs_f64());
            // Leave a running edit of the reading alone.
            if !menu.navigation().is_editing() {
                menu.tree_mut().set_number(TEMPERATURE_ITEM, reading);
            }
            last_sample = Instant::now();
        }

        // --- Menu tick ----------------------------------------------------
        if let Some(event) = menu.update() {
            println!();
            info!("Menu event: {:?}", event);
        }

        // --- Tick pacing --------------------------------------------------
        let elapsed = tick_start.elapsed();
        if elapsed < TICK_DURATION {
            std::thread::sleep(TICK_DURATION - elapsed);
        }
    }

    println!();
    info!("Simulator exiting");
}
