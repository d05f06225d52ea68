//! Rolling frame and unit-count statistics for the debug overlay.

use crate::effect::Census;

/// Ring buffer that stores the last N samples of a metric.
pub struct RingBuffer {
    data: Vec<f32>,
    head: usize,
    len: usize,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: vec![0.0; capacity],
            head: 0,
            len: 0,
            capacity,
        }
    }

    pub fn push(&mut self, value: f32) {
        self.data[self.head] = value;
        self.head = (self.head + 1) % self.capacity;
        if self.len < self.capacity {
            self.len += 1;
        }
    }

    /// Return samples in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let start = if self.len < self.capacity {
            0
        } else {
            self.head
        };
        (0..self.len).map(move |i| self.data[(start + i) % self.capacity])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn last(&self) -> Option<f32> {
        if self.len == 0 {
            None
        } else {
            let idx = (self.head + self.capacity - 1) % self.capacity;
            Some(self.data[idx])
        }
    }

    pub fn max(&self) -> Option<f32> {
        self.iter().reduce(f32::max)
    }
}

pub struct SkyStats {
    pub frame_ms: RingBuffer,
    pub live_units: RingBuffer,
    pub sample_interval: u32,
    frame_counter: u32,
}

impl SkyStats {
    pub fn new(capacity: usize) -> Self {
        Self {
            frame_ms: RingBuffer::new(capacity),
            live_units: RingBuffer::new(capacity),
            sample_interval: 6,
            frame_counter: 0,
        }
    }

    /// Record one displayed frame. Samples are kept every `sample_interval` frames.
    pub fn record(&mut self, frame_ms: f32, census: &[(&'static str, Census)]) {
        self.frame_counter = self.frame_counter.wrapping_add(1);
        if self.frame_counter % self.sample_interval != 0 {
            return;
        }
        let total: usize = census.iter().map(|(_, c)| c.total()).sum();
        self.frame_ms.push(frame_ms);
        self.live_units.push(total as f32);
    }
}
