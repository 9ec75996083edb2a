use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{channel, Receiver, Sender},
    Arc,
};

use alloy::primitives::{address, U256};

use super::bits::{Address, Amount};

pub fn get_mock_address_1() -> Address {
    address!("0xd8da6bf26964af9d7eed9e03e53415d37aa96045")
}

pub fn get_mock_address_2() -> Address {
    address!("0xd8da6bf26964af9d7eed9e03e53415d37aa96046")
}

pub fn get_mock_address_3() -> Address {
    address!("0xd8da6bf26964af9d7eed9e03e53415d37aa96047")
}

/// Address of the distributed token
pub fn get_mock_token_address() -> Address {
    address!("0x501ace9c35e60f03a2af4d484f49f9b1efde9f40")
}

/// Address of the governor in tests
pub fn get_mock_governor_address() -> Address {
    address!("0x0000000000000000000000000000000000000a11")
}

/// Address of the token locker in tests
pub fn get_mock_locker_address() -> Address {
    address!("0x501ace47c5b0c2099c4464f681c3fa2ecd3146c1")
}

pub fn get_mock_amount(value: u64) -> Amount {
    U256::from(value)
}

pub fn get_mock_channel<T>() -> (Sender<T>, Receiver<T>) {
    channel::<T>()
}

pub fn get_mock_atomic_bool_pair() -> (Arc<AtomicBool>, Arc<AtomicBool>) {
    let called_1 = Arc::new(AtomicBool::new(false));
    let called_2 = called_1.clone();
    (called_1, called_2)
}

pub fn flag_mock_atomic_bool(value: &AtomicBool) {
    value.store(true, Ordering::Relaxed);
}

pub fn test_mock_atomic_bool(value: &AtomicBool) -> bool {
    value.load(Ordering::Relaxed)
}
