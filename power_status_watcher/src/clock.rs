#[cfg(test)]
use mockall::automock;
use shared_kernel::date_time::kyiv_date_time::KyivTZDateTime;

#[cfg_attr(test, automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> KyivTZDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> KyivTZDateTime {
        KyivTZDateTime::now()
    }
}
