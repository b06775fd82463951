use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};

use sales_forecast::{
    Dataset, ModelConfig, ProductIndex, SalesRecord, TrainConfig, build_regressor, encode,
    forecast,
};

struct CountingAlloc {
    allocs: AtomicUsize,
    reallocs: AtomicUsize,
    live_bytes: AtomicIsize,
}

impl CountingAlloc {
    const fn new() -> Self {
        Self {
            allocs: AtomicUsize::new(0),
            reallocs: AtomicUsize::new(0),
            live_bytes: AtomicIsize::new(0),
        }
    }

    fn reset(&self) {
        self.allocs.store(0, Ordering::Relaxed);
        self.reallocs.store(0, Ordering::Relaxed);
        self.live_bytes.store(0, Ordering::Relaxed);
    }

    fn alloc_events(&self) -> usize {
        self.allocs.load(Ordering::Relaxed) + self.reallocs.load(Ordering::Relaxed)
    }

    fn live_bytes(&self) -> isize {
        self.live_bytes.load(Ordering::Relaxed)
    }
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.allocs.fetch_add(1, Ordering::Relaxed);
        self.live_bytes
            .fetch_add(layout.size() as isize, Ordering::Relaxed);
        unsafe { System.alloc(layout) }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        self.allocs.fetch_add(1, Ordering::Relaxed);
        self.live_bytes
            .fetch_add(layout.size() as isize, Ordering::Relaxed);
        unsafe { System.alloc_zeroed(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.live_bytes
            .fetch_sub(layout.size() as isize, Ordering::Relaxed);
        unsafe { System.dealloc(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        self.reallocs.fetch_add(1, Ordering::Relaxed);
        self.live_bytes.fetch_add(
            new_size as isize - layout.size() as isize,
            Ordering::Relaxed,
        );
        unsafe { System.realloc(ptr, layout, new_size) }
    }
}

#[global_allocator]
static ALLOC: CountingAlloc = CountingAlloc::new();

fn training_set() -> (Dataset, ProductIndex) {
    let mut records = Vec::new();
    for month in 1..=12 {
        for (product, base) in [("Coffee", 10), ("Tea", 4), ("Cocoa", 7)] {
            records.push(SalesRecord::new(
                format!("2024-{month:02}-10"),
                product,
                (base + month).to_string(),
            ));
        }
    }
    let encoded = encode(&records);
    let data = Dataset::from_encoded(&encoded).unwrap();
    (data, encoded.into_products())
}

// A single test: the counters are process-wide, so parallel tests would skew them.
#[test]
fn training_and_forecasting_keep_allocations_bounded() {
    let (data, products) = training_set();
    let base = build_regressor(&ModelConfig {
        hidden_units: 10,
        seed: Some(0),
    })
    .unwrap();

    let short = TrainConfig {
        epochs: 1,
        ..TrainConfig::default()
    };
    let long = TrainConfig {
        epochs: 200,
        ..TrainConfig::default()
    };

    // Warm up one-time lazy state (log callsite registration and the like).
    base.clone().fit(&data, &short).unwrap();

    let mut mlp_short = base.clone();
    ALLOC.reset();
    mlp_short.fit(&data, &short).unwrap();
    let alloc_short = ALLOC.alloc_events();

    let mut mlp_long = base;
    ALLOC.reset();
    mlp_long.fit(&data, &long).unwrap();
    let alloc_long = ALLOC.alloc_events();

    assert_eq!(
        alloc_short, alloc_long,
        "training allocations should not depend on the epoch count"
    );

    ALLOC.reset();
    let points = forecast(&mlp_long, &products, 6).unwrap();
    assert_eq!(points.len(), 18);
    drop(points);
    assert_eq!(
        ALLOC.live_bytes(),
        0,
        "forecasting must release every inference buffer"
    );
}
