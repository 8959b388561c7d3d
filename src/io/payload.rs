use rand::RngCore;

/// The random buffer one worker writes into every one of its files
#[derive(Debug, Clone)]
pub struct Payload {
    data: Vec<u8>,
}

impl Payload {
    /// Allocate `size` bytes and fill them from `rng`
    pub fn random<R: RngCore + ?Sized>(size: usize, rng: &mut R) -> Self {
        let mut data = vec![0u8; size];
        rng.fill_bytes(&mut data);
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
