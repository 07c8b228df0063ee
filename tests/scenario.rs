//! End-to-end lifecycle scenario driven through the manager layer against
//! an in-memory store, so the suite runs without a live database.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::NaiveDate;
use gradus::prelude::*;

/// HashMap-backed [`RecordStore`] with sequential id assignment.
#[derive(Default)]
struct MemoryStore {
    rows: Mutex<HashMap<i32, Student>>,
    next_id: Mutex<i32>,
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    type Record = Student;

    fn table_name(&self) -> &str {
        "student"
    }

    async fn create(&self, record: &mut Student) -> Result<(), StoreError> {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        record.set_id(*next);
        self.rows.lock().unwrap().insert(*next, record.clone());
        Ok(())
    }

    async fn update(&self, record: &Student) -> Result<u64, StoreError> {
        let id = record.id().ok_or_else(|| {
            StoreError::invalid_argument("update", "student", "record id is required")
        })?;
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id) {
            Some(row) => {
                *row = record.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: &i32) -> Result<bool, StoreError> {
        Ok(self.rows.lock().unwrap().remove(id).is_some())
    }

    async fn get_by_id(&self, id: &i32) -> Result<Option<Student>, StoreError> {
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn get_by_ids(&self, ids: &[i32]) -> Result<Vec<Student>, StoreError> {
        if ids.is_empty() {
            return Err(StoreError::invalid_argument(
                "get_by_ids",
                "student",
                "id list is empty",
            ));
        }
        let rows = self.rows.lock().unwrap();
        Ok(ids.iter().filter_map(|id| rows.get(id).cloned()).collect())
    }

    async fn list(&self, _filter: &Filter) -> Result<Vec<Student>, StoreError> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn count(&self, _filter: &Filter) -> Result<i64, StoreError> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }

    async fn exists(&self, id: &i32) -> Result<bool, StoreError> {
        Ok(self.rows.lock().unwrap().contains_key(id))
    }
}

fn manager() -> BaseManager<MemoryStore> {
    BaseManager::new(MemoryStore::default(), Duration::from_secs(5))
}

fn student(surname: &str) -> Student {
    Student {
        surname: surname.to_string(),
        name: "Anna".to_string(),
        birthday: NaiveDate::from_ymd_opt(2011, 2, 20),
        group_id: Some(2),
        musprogramm_id: Some(1),
        ..Student::default()
    }
}

#[tokio::test]
async fn full_record_lifecycle() {
    let manager = manager();

    // create assigns an id and writes it back
    let mut record = student("Orlova");
    manager.create(&mut record).await.unwrap();
    assert_eq!(record.student_id, Some(1));

    // the stored row round-trips
    let fetched = manager.get_by_id(&1).await.unwrap().unwrap();
    assert_eq!(fetched, record);

    // update overwrites in place
    let mut changed = fetched.clone();
    changed.name = "Anya".to_string();
    assert_eq!(manager.update(&changed).await.unwrap(), 1);
    let fetched = manager.get_by_id(&1).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Anya");

    // delete removes the row; reads and existence checks agree
    assert!(manager.delete(&1).await.unwrap());
    assert_eq!(manager.get_by_id(&1).await.unwrap(), None);
    assert!(!manager.exists(&1).await.unwrap());

    // updating the vanished row affects nothing
    assert_eq!(manager.update(&changed).await.unwrap(), 0);
}

#[tokio::test]
async fn get_by_ids_skips_missing_rows() {
    let manager = manager();
    let mut a = student("Pervaya");
    let mut b = student("Vtoraya");
    manager.create(&mut a).await.unwrap();
    manager.create(&mut b).await.unwrap();

    let found = manager.get_by_ids(&[1, 2, 99]).await.unwrap();
    assert_eq!(found.len(), 2);

    let err = manager.get_by_ids(&[]).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument { .. }));
}

#[tokio::test]
async fn invalid_record_never_reaches_the_store() {
    let manager = manager();
    let mut record = Student::default();
    let err = manager.create(&mut record).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(manager.count(&Filter::new()).await.unwrap(), 0);
    // the failed record keeps no id
    assert_eq!(record.student_id, None);
}

#[tokio::test]
async fn batch_with_one_invalid_record_writes_nothing() {
    let manager = manager();
    let records = vec![student("Odna"), Student::default()];
    let err = BaseManager::<MemoryStore>::validate_all(&records).unwrap_err();
    assert!(err.message("records[1].surname").is_some());
    // validate_all gates bulk operations; with a failure nothing is stored
    assert_eq!(manager.count(&Filter::new()).await.unwrap(), 0);
}
