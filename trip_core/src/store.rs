//! Load-mutate-save helpers shared by the entity stores.

use crate::error::{Error, Result};
use crate::repository::{LoadReport, Repository};
use crate::types::Record;

/// A collection accessed through its repository, one whole-file cycle per call
pub(crate) struct RecordStore<T: Record> {
    repo: Box<dyn Repository<T>>,
}

impl<T: Record> RecordStore<T> {
    pub(crate) fn new(repo: impl Repository<T> + 'static) -> Self {
        Self {
            repo: Box::new(repo),
        }
    }

    pub(crate) fn load_all(&self) -> Result<Vec<T>> {
        self.repo.load_all()
    }

    pub(crate) fn load_report(&self) -> Result<LoadReport<T>> {
        self.repo.load_report()
    }

    pub(crate) fn save_all(&self, records: &[T]) -> Result<()> {
        self.repo.save_all(records)
    }

    pub(crate) fn find(&self, id: &str) -> Result<T> {
        self.load_all()?
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| Error::not_found(T::KIND, id))
    }

    /// Records matching `pred`, in storage order
    pub(crate) fn filter<P>(&self, pred: P) -> Result<Vec<T>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self.load_all()?.into_iter().filter(|r| pred(r)).collect())
    }

    pub(crate) fn append(&self, record: T) -> Result<T> {
        let mut records = self.load_all()?;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(Error::validation(format!(
                "{} with ID '{}' already exists",
                T::KIND,
                record.id()
            )));
        }
        records.push(record.clone());
        self.save_all(&records)?;
        Ok(record)
    }

    /// Apply `f` to the record with `id`, saving only when it reports a change
    pub(crate) fn modify<F, R>(&self, id: &str, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> Result<(R, bool)>,
    {
        let mut records = self.load_all()?;
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| Error::not_found(T::KIND, id))?;

        let (result, changed) = f(record)?;
        if changed {
            self.save_all(&records)?;
        }
        Ok(result)
    }

    pub(crate) fn remove(&self, id: &str) -> Result<T> {
        let mut records = self.load_all()?;
        let pos = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Error::not_found(T::KIND, id))?;

        let removed = records.remove(pos);
        self.save_all(&records)?;
        Ok(removed)
    }
}
