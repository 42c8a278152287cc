use tracing_subscriber::EnvFilter;
use vfs_sort_kit::{Algorithm, Bag, Descending, SortEngine};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut bag = Bag::new();
    for n in 0..20 {
        bag.add(n);
    }

    println!("Before sort:");
    for n in bag.elements() {
        println!("{n}");
    }

    let mut numbers = bag.drain();
    SortEngine::new(Algorithm::Heap).sort(&mut numbers, &Descending);

    println!();
    println!("After sort:");
    for n in &numbers {
        println!("{n}");
    }
}
