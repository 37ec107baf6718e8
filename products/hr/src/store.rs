use async_trait::async_trait;
use entity::employees;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set, Unchanged},
    ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Statement,
};

use crate::{
    gateway::{EmployeeGateway, StorageError},
    model::{Employee, EmployeeId},
};

/// [`EmployeeGateway`] backed by the `employees` table.
#[derive(Clone, Debug)]
pub struct SeaOrmEmployeeGateway {
    db: DatabaseConnection,
}

impl SeaOrmEmployeeGateway {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Same lookup as [`EmployeeGateway::find_by_name`], issued as a
    /// hand-written parameterised statement.
    pub async fn find_by_name_native(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Employee>, StorageError> {
        let backend = self.db.get_database_backend();
        let sql = match backend {
            DatabaseBackend::Postgres => {
                "SELECT * FROM employees WHERE first_name = $1 AND last_name = $2 ORDER BY id LIMIT 1"
            }
            _ => "SELECT * FROM employees WHERE first_name = ? AND last_name = ? ORDER BY id LIMIT 1",
        };
        let found = employees::Entity::find()
            .from_raw_sql(Statement::from_sql_and_values(
                backend,
                sql,
                [first_name.into(), last_name.into()],
            ))
            .one(&self.db)
            .await?;
        Ok(found.map(Employee::from))
    }
}

#[async_trait]
impl EmployeeGateway for SeaOrmEmployeeGateway {
    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StorageError> {
        let found = employees::Entity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(Employee::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, StorageError> {
        let found = employees::Entity::find()
            .filter(employees::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(found.map(Employee::from))
    }

    async fn find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Employee>, StorageError> {
        let found = employees::Entity::find()
            .filter(employees::Column::FirstName.eq(first_name))
            .filter(employees::Column::LastName.eq(last_name))
            .order_by_asc(employees::Column::Id)
            .one(&self.db)
            .await?;
        Ok(found.map(Employee::from))
    }

    async fn find_all(&self) -> Result<Vec<Employee>, StorageError> {
        let rows = employees::Entity::find()
            .order_by_asc(employees::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn save(&self, employee: Employee) -> Result<Employee, StorageError> {
        let Employee {
            id,
            first_name,
            last_name,
            email,
        } = employee;
        let record = employees::ActiveModel {
            id: id.map_or(NotSet, Unchanged),
            first_name: Set(first_name),
            last_name: Set(last_name),
            email: Set(email),
        };
        let saved = match id {
            None => record.insert(&self.db).await?,
            Some(_) => record.update(&self.db).await?,
        };
        Ok(saved.into())
    }

    async fn delete_by_id(&self, id: EmployeeId) -> Result<(), StorageError> {
        employees::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
