//! Throttled IO.
//!
//! Reads from `/dev/zero` and writes to `/dev/null` with a fixed byte rate.
use std::io::{self, Read, Write};
use std::{fs, time::Instant};

use ticktock::ThrottledIo;

const BUFFER_SIZE: usize = 500;
const TOTAL_BYTES: usize = 1000 * 1000;
const SPEED: u32 = 250 * 1000;

fn main() -> io::Result<()> {
    env_logger::init();

    println!("Reading 1 mb from /dev/zero at 250 kb/s.");
    let mut buf = [0; BUFFER_SIZE];
    let mut zero = ThrottledIo::new(fs::File::open("/dev/zero")?, SPEED);

    let start = Instant::now();
    let mut remaining = TOTAL_BYTES;
    while remaining > 0 {
        let n = zero.read(&mut buf[..remaining.min(BUFFER_SIZE)])?;
        remaining -= n;
    }
    println!("Read took {:?}", start.elapsed());

    println!("Writing 1 mb to /dev/null at 250 kb/s.");
    let input = [0xFF; BUFFER_SIZE];
    let mut null = ThrottledIo::new(fs::File::create("/dev/null")?, SPEED);

    let start = Instant::now();
    for _ in 0..TOTAL_BYTES / BUFFER_SIZE {
        null.write_all(&input)?;
    }
    null.flush()?;
    println!("Write took {:?}", start.elapsed());

    Ok(())
}
