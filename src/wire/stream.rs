use crate::column::Schema;
use crate::error::Result;
use crate::wire::encode::{encode, Record};

/// Turns a lazy sequence of row-batches into a lazy sequence of encoded
/// wire buffers, preserving order and assigning monotonic `seq` starting at
/// zero.
///
/// `source` yields one `Vec<Record>` per call, or `None` to end the stream,
/// or propagates a producer error which ends the stream after emitting it.
pub struct EncodedBatchStream<'s, F> {
    schema: &'s [Schema],
    next_seq: u32,
    source: F,
    done: bool,
}

impl<'s, F> EncodedBatchStream<'s, F>
where
    F: FnMut() -> Option<Result<Vec<Record>>>,
{
    #[must_use]
    pub const fn new(schema: &'s [Schema], source: F) -> Self {
        Self {
            schema,
            next_seq: 0,
            source,
            done: false,
        }
    }
}

impl<F> Iterator for EncodedBatchStream<'_, F>
where
    F: FnMut() -> Option<Result<Vec<Record>>>,
{
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match (self.source)() {
            None => {
                self.done = true;
                None
            }
            Some(Err(err)) => {
                self.done = true;
                Some(Err(err))
            }
            Some(Ok(rows)) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                Some(Ok(encode(self.schema, &rows, seq)))
            }
        }
    }
}
