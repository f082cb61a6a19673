use mint::Vector3;

use crate::{
    decode, encode_set, encode_to_string, Config, DecodeError, Error, ParsePolicy, ReceiveSet,
    TransmitSet, Triple, Variant, MAX_SETS, TEXT_CAPACITY,
};

/// Owns both sides of a link: the outgoing triples and label, and the last set received.
///
/// Every setter either applies completely or returns an error and leaves the codec as it was.
/// The codec does no locking of its own; share it behind a `Mutex` if more than one thread
/// needs it.
#[derive(Clone, Debug, PartialEq)]
pub struct SerialCodec {
    tx_sets: usize,
    rx_sets: usize,
    transmit: TransmitSet,
    text: heapless::String<TEXT_CAPACITY>,
    received: ReceiveSet,
    parse_policy: ParsePolicy,
}

impl Default for SerialCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialCodec {
    /// Integer triples, one transmit set, no receive sets.
    pub fn new() -> Self {
        Self {
            tx_sets: 1,
            rx_sets: 0,
            transmit: TransmitSet::zeroed(Variant::Int),
            text: heapless::String::new(),
            received: ReceiveSet::new(),
            parse_policy: ParsePolicy::Lenient,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        if config.tx_sets.saturating_add(config.rx_sets) > MAX_SETS {
            return Err(Error::InvalidCount { tx: config.tx_sets, rx: config.rx_sets });
        }

        let mut codec = Self::new();
        codec.set_variant(config.variant);
        codec.tx_sets = config.tx_sets;
        codec.rx_sets = config.rx_sets;
        codec.set_text(&config.text);
        codec.parse_policy = config.parse_policy;
        Ok(codec)
    }

    pub fn variant(&self) -> Variant {
        self.transmit.variant()
    }

    /// Switches the transmit representation, returning whether it changed. A change discards
    /// every transmit triple.
    pub fn set_variant(&mut self, variant: Variant) -> bool {
        if variant == self.variant() {
            return false;
        }
        log::debug!("switching transmit triples from {} to {}", self.variant(), variant);
        self.transmit = TransmitSet::zeroed(variant);
        true
    }

    /// Same as [`set_variant`](Self::set_variant), by name (`"int"` or `"float"`).
    pub fn set_variant_name(&mut self, name: &str) -> Result<bool, Error> {
        let variant = name.parse::<Variant>()?;
        Ok(self.set_variant(variant))
    }

    pub fn tx_sets(&self) -> usize {
        self.tx_sets
    }

    pub fn set_tx_sets(&mut self, sets: usize) -> Result<(), Error> {
        if sets.saturating_add(self.rx_sets) > MAX_SETS {
            return Err(Error::InvalidCount { tx: sets, rx: self.rx_sets });
        }
        self.tx_sets = sets;
        Ok(())
    }

    pub fn rx_sets(&self) -> usize {
        self.rx_sets
    }

    /// Sets how many triples a decode keeps. Lowering it drops received triples past the new
    /// count.
    pub fn set_rx_sets(&mut self, sets: usize) -> Result<(), Error> {
        if sets.saturating_add(self.tx_sets) > MAX_SETS {
            return Err(Error::InvalidCount { tx: self.tx_sets, rx: sets });
        }
        self.rx_sets = sets;
        self.received.truncate(sets);
        Ok(())
    }

    fn slot(&self, set_num: usize) -> Result<usize, Error> {
        if set_num == 0 || set_num > self.tx_sets {
            return Err(Error::InvalidSetIndex { index: set_num, count: self.tx_sets });
        }
        Ok(set_num - 1)
    }

    /// Stores a transmit triple. `set_num` is 1-based and must be within the transmit count,
    /// and the triple must match the active variant.
    pub fn set_coordinates(&mut self, set_num: usize, triple: impl Into<Triple>) -> Result<(), Error> {
        let slot = self.slot(set_num)?;
        self.transmit.write(slot, triple.into())
    }

    pub fn coordinates(&self, set_num: usize) -> Result<Triple, Error> {
        let slot = self.slot(set_num)?;
        self.transmit
            .get(slot)
            .ok_or(Error::InvalidSetIndex { index: set_num, count: self.tx_sets })
    }

    pub fn reset_coordinates(&mut self) {
        self.transmit.reset();
    }

    pub fn transmit_set(&self) -> &TransmitSet {
        &self.transmit
    }

    /// Replaces the label, keeping as many whole characters as fit in `TEXT_CAPACITY` bytes.
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        for c in text.chars() {
            if self.text.push(c).is_err() {
                log::trace!("label truncated to {} bytes", self.text.len());
                break;
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Writes the wire form of the configured transmit triples and label into `out`, returning
    /// the number of content bytes. See [`encode`](crate::encode) for the truncation rules.
    pub fn encode_into(&self, out: &mut [u8]) -> usize {
        encode_set(&self.transmit, self.tx_sets, &self.text, out)
    }

    pub fn to_wire_string(&self) -> String {
        match &self.transmit {
            TransmitSet::Int(sets) => encode_to_string(&sets[..self.tx_sets], &self.text),
            TransmitSet::Float(sets) => encode_to_string(&sets[..self.tx_sets], &self.text),
        }
    }

    pub fn parse_policy(&self) -> ParsePolicy {
        self.parse_policy
    }

    pub fn set_parse_policy(&mut self, policy: ParsePolicy) {
        self.parse_policy = policy;
    }

    /// Decodes `input` and, on success, replaces the received set. Returns the number of
    /// triples received. A rejected input keeps the previous set.
    pub fn parse_received(&mut self, input: &str) -> Result<usize, DecodeError> {
        match decode(input, self.rx_sets, self.parse_policy) {
            Ok(received) => {
                self.received = received;
                Ok(self.received.len())
            }
            Err(e) => {
                log::debug!("rejected received data {:?}: {}", input, e);
                Err(e)
            }
        }
    }

    pub fn received_len(&self) -> usize {
        self.received.len()
    }

    /// Received triple at the 0-based `index`.
    pub fn received(&self, index: usize) -> Option<Vector3<f32>> {
        self.received.get(index).copied()
    }

    pub fn received_sets(&self) -> &ReceiveSet {
        &self.received
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let codec = SerialCodec::new();
        assert_eq!(codec.variant(), Variant::Int);
        assert_eq!(codec.tx_sets(), 1);
        assert_eq!(codec.rx_sets(), 0);
        assert_eq!(codec.text(), "");
        assert_eq!(codec.received_len(), 0);
        assert_eq!(codec.to_wire_string(), "0,0,0;");
    }

    #[test]
    fn counts_share_the_maximum() {
        let mut codec = SerialCodec::new();
        codec.set_tx_sets(3).unwrap();
        codec.set_rx_sets(2).unwrap();
        assert_eq!(codec.set_rx_sets(3), Err(Error::InvalidCount { tx: 3, rx: 3 }));
        assert_eq!(codec.set_tx_sets(4), Err(Error::InvalidCount { tx: 4, rx: 2 }));
        assert_eq!((codec.tx_sets(), codec.rx_sets()), (3, 2));
        codec.set_tx_sets(0).unwrap();
        codec.set_rx_sets(MAX_SETS).unwrap();
    }

    #[test]
    fn set_index_is_one_based() {
        let mut codec = SerialCodec::new();
        codec.set_tx_sets(2).unwrap();
        assert_eq!(
            codec.set_coordinates(0, (1, 2, 3)),
            Err(Error::InvalidSetIndex { index: 0, count: 2 })
        );
        assert_eq!(
            codec.set_coordinates(3, (1, 2, 3)),
            Err(Error::InvalidSetIndex { index: 3, count: 2 })
        );
        codec.set_coordinates(2, (7, 8, 9)).unwrap();
        assert_eq!(codec.coordinates(2), Ok(Triple::Int(Vector3::from([7, 8, 9]))));
        assert_eq!(codec.coordinates(1), Ok(Triple::Int(Vector3::from([0, 0, 0]))));
    }

    #[test]
    fn typed_writes_follow_the_active_variant() {
        let mut codec = SerialCodec::new();
        codec.set_coordinates(1, (4, 5, 6)).unwrap();
        assert_eq!(
            codec.set_coordinates(1, (1.0_f32, 2.0_f32, 3.0_f32)),
            Err(Error::VariantMismatch { active: Variant::Int, requested: Variant::Float })
        );
        assert_eq!(codec.coordinates(1), Ok(Triple::Int(Vector3::from([4, 5, 6]))));
    }

    #[test]
    fn changing_variant_zeroes_transmit_set() {
        let mut codec = SerialCodec::new();
        codec.set_coordinates(1, (4, 5, 6)).unwrap();
        assert!(!codec.set_variant(Variant::Int));
        assert_eq!(codec.coordinates(1), Ok(Triple::Int(Vector3::from([4, 5, 6]))));

        assert!(codec.set_variant(Variant::Float));
        assert_eq!(codec.coordinates(1), Ok(Triple::Float(Vector3::from([0.0; 3]))));
        assert_eq!(codec.to_wire_string(), "0.00,0.00,0.00;");
    }

    #[test]
    fn variant_by_name() {
        let mut codec = SerialCodec::new();
        assert_eq!(codec.set_variant_name("float"), Ok(true));
        assert_eq!(codec.set_variant_name("float"), Ok(false));
        assert_eq!(
            codec.set_variant_name("Float"),
            Err(Error::InvalidVariant("Float".to_string()))
        );
        assert_eq!(codec.variant(), Variant::Float);
    }

    #[test]
    fn label_is_truncated_on_char_boundary() {
        let mut codec = SerialCodec::new();
        codec.set_text(&"a".repeat(TEXT_CAPACITY + 10));
        assert_eq!(codec.text().len(), TEXT_CAPACITY);

        // two byte characters cannot fill an odd capacity exactly
        codec.set_text(&"é".repeat(TEXT_CAPACITY));
        assert_eq!(codec.text().chars().count(), TEXT_CAPACITY / 2);
        assert!(codec.text().len() <= TEXT_CAPACITY);
    }

    #[test]
    fn failed_decode_keeps_previous_set() {
        let mut codec = SerialCodec::new();
        codec.set_tx_sets(0).unwrap();
        codec.set_rx_sets(2).unwrap();
        assert_eq!(codec.parse_received("1,2,3;"), Ok(1));
        assert_eq!(codec.parse_received("4,5,6,7;"), Err(DecodeError::IncompleteTriple { values: 4 }));
        assert_eq!(codec.parse_received("4,5,6"), Err(DecodeError::MalformedTerminator));
        assert_eq!(codec.received_len(), 1);
        assert_eq!(codec.received(0), Some(Vector3::from([1.0, 2.0, 3.0])));
        assert_eq!(codec.received(1), None);
    }

    #[test]
    fn lowering_rx_sets_trims_received() {
        let mut codec = SerialCodec::new();
        codec.set_rx_sets(3).unwrap();
        assert_eq!(codec.parse_received("1,2,3,4,5,6,7,8,9;"), Ok(3));
        codec.set_rx_sets(1).unwrap();
        assert_eq!(codec.received_len(), 1);
    }

    #[test]
    fn from_config_validates_counts() {
        let config = Config { tx_sets: 4, rx_sets: 2, ..Config::default() };
        assert_eq!(SerialCodec::from_config(&config), Err(Error::InvalidCount { tx: 4, rx: 2 }));

        let config = Config {
            variant: Variant::Float,
            tx_sets: 2,
            rx_sets: 3,
            text: "Hi".to_string(),
            parse_policy: ParsePolicy::Strict,
        };
        let codec = SerialCodec::from_config(&config).unwrap();
        assert_eq!(codec.variant(), Variant::Float);
        assert_eq!((codec.tx_sets(), codec.rx_sets()), (2, 3));
        assert_eq!(codec.parse_policy(), ParsePolicy::Strict);
        assert_eq!(codec.to_wire_string(), "0.00,0.00,0.00,0.00,0.00,0.00;Hi");
    }
}
