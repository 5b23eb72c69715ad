//! Bounded face buffer that hands full batches to the GPU boundary while
//! the mesher is still walking the grid.

use crate::engine_state::rendering::vertex::FaceVertex;

/// Receives each flushed batch of face records.
pub trait VertexBatchSubmitter {
    fn submit_batch(&mut self, batch: &[FaceVertex]);
}

impl<F> VertexBatchSubmitter for F
where
    F: FnMut(&[FaceVertex]),
{
    fn submit_batch(&mut self, batch: &[FaceVertex]) {
        self(batch)
    }
}

/// Counts for one traversal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SinkTotals {
    /// Faces pushed (and therefore flushed)
    pub faces: usize,
    /// Batches handed to the submitter
    pub batches: usize,
}

/// Fixed-capacity face buffer with flush-on-full.
///
/// The buffer is borrowed so its allocation survives from frame to frame.
/// It is flushed as soon as it holds `capacity` faces, so it never holds
/// more than that, and [`StreamingVertexSink::finish`] flushes whatever is
/// left. Batches are always the whole buffer so far.
pub struct StreamingVertexSink<'a, S: VertexBatchSubmitter + ?Sized> {
    buffer: &'a mut Vec<FaceVertex>,
    capacity: usize,
    submitter: &'a mut S,
    totals: SinkTotals,
}

impl<'a, S: VertexBatchSubmitter + ?Sized> StreamingVertexSink<'a, S> {
    /// Creates a sink. Any stale contents of `buffer` are discarded and a
    /// zero capacity is treated as one.
    pub fn new(buffer: &'a mut Vec<FaceVertex>, capacity: usize, submitter: &'a mut S) -> Self {
        let capacity = capacity.max(1);
        buffer.clear();
        Self {
            buffer,
            capacity,
            submitter,
            totals: SinkTotals::default(),
        }
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Faces waiting for the next flush.
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Appends a face, flushing if that fills the buffer.
    pub fn push(&mut self, face: FaceVertex) {
        self.buffer.push(face);
        self.totals.faces += 1;
        if self.buffer.len() >= self.capacity {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        self.submitter.submit_batch(&self.buffer[..]);
        self.totals.batches += 1;
        self.buffer.clear();
    }

    /// Flushes the remainder and reports what went through.
    pub fn finish(mut self) -> SinkTotals {
        self.flush();
        self.totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_side::BlockSide;
    use cgmath::Point3;

    fn face(i: i32) -> FaceVertex {
        FaceVertex::new(Point3::new(i, 0, 0), BlockSide::UP, 0, [0.0; 4])
    }

    #[test]
    fn flushes_every_full_buffer_and_the_remainder() {
        let mut batches: Vec<Vec<FaceVertex>> = Vec::new();
        let mut record = |batch: &[FaceVertex]| batches.push(batch.to_vec());
        let mut buffer = Vec::new();

        let mut sink = StreamingVertexSink::new(&mut buffer, 4, &mut record);
        for i in 0..10 {
            sink.push(face(i));
            assert!(sink.pending() < sink.capacity());
        }
        let totals = sink.finish();

        assert_eq!(totals, SinkTotals { faces: 10, batches: 3 });
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        let flushed: Vec<i32> = batches.iter().flatten().map(|f| f.position[0]).collect();
        assert_eq!(flushed, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn exact_multiple_leaves_nothing_for_finish() {
        let mut count = 0;
        let mut record = |_: &[FaceVertex]| count += 1;
        let mut buffer = Vec::new();

        let mut sink = StreamingVertexSink::new(&mut buffer, 3, &mut record);
        for i in 0..6 {
            sink.push(face(i));
        }
        assert_eq!(sink.finish().batches, 2);
        assert_eq!(count, 2);
    }

    #[test]
    fn empty_traversal_submits_nothing() {
        let mut count = 0;
        let mut record = |_: &[FaceVertex]| count += 1;
        let mut buffer = vec![face(99)];

        let sink = StreamingVertexSink::new(&mut buffer, 8, &mut record);
        assert_eq!(sink.finish(), SinkTotals::default());
        assert_eq!(count, 0);
    }

    #[test]
    fn zero_capacity_flushes_every_face() {
        let mut count = 0;
        let mut record = |_: &[FaceVertex]| count += 1;
        let mut buffer = Vec::new();

        let mut sink = StreamingVertexSink::new(&mut buffer, 0, &mut record);
        sink.push(face(0));
        sink.push(face(1));
        assert_eq!(sink.finish().batches, 2);
        assert_eq!(count, 2);
    }
}
