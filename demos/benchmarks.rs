//
// Copyright (c) 2025 Nathan Fiedler
//
use growarray::{GrowableArray, reserve};
use std::time::Instant;

//
// Compare the time to fill a growable array against a vector, both starting
// with zero capacity and growing by doubling, then again with the full
// capacity reserved up front.
//

fn create_growable(size: u64) {
    let start = Instant::now();
    let mut coll: GrowableArray<u64> = GrowableArray::new();
    for value in 0..size {
        coll.push_back(value);
    }
    let duration = start.elapsed();
    println!("growable: {:?}", duration);
}

fn create_growable_reserved(size: u64) {
    let start = Instant::now();
    let mut coll: GrowableArray<u64> = GrowableArray::from(reserve(size as usize));
    for value in 0..size {
        coll.push_back(value);
    }
    let duration = start.elapsed();
    println!("growable (reserved): {:?}", duration);
}

fn create_vector(size: u64) {
    let start = Instant::now();
    let mut coll: Vec<u64> = Vec::new();
    for value in 0..size {
        coll.push(value);
    }
    let duration = start.elapsed();
    println!("vector: {:?}", duration);
}

fn main() {
    println!("creating GrowableArray...");
    create_growable(100_000_000);
    create_growable_reserved(100_000_000);
    println!("creating Vec...");
    create_vector(100_000_000);
}
