use fake::{
    faker::{
        address::en::{CityName, CountryName},
        internet::en::SafeEmail,
        name::en::{FirstName, LastName},
        phone_number::en::PhoneNumber,
    },
    Dummy, Fake, Faker,
};
use sqlx::PgPool;

use crate::model::user::{User, UserFields, COLUMNS, TABLE_NAME};

pub struct UserFactory<T: Clone> {
    modifier_one: fn(x: &UserFields, ext: T) -> UserFields,
    modifier_many: fn(x: &UserFields, idx: usize, ext: T) -> UserFields,
}

impl<T: Clone> Default for UserFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> UserFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
            modifier_many: |x, _, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &UserFields, ext: T) -> UserFields) {
        self.modifier_one = modifier
    }

    pub fn modified_many(&mut self, modifier: fn(x: &UserFields, idx: usize, ext: T) -> UserFields) {
        self.modifier_many = modifier
    }

    async fn insert(db: &PgPool, data: &UserFields) -> anyhow::Result<User> {
        let user: User = sqlx::query_as(
            format!(
                r#"
            INSERT INTO {} (email, first_name, last_name, country, city, phone_number, profile_picture)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}"#,
                TABLE_NAME, COLUMNS
            )
            .as_str(),
        )
        .bind(&data.email)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.country)
        .bind(&data.city)
        .bind(&data.phone_number)
        .bind(&data.profile_picture)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn generate_one(&mut self, db: &PgPool, ext: T) -> anyhow::Result<User> {
        let data = UserDummy::generate_one();
        let data = (self.modifier_one)(&data, ext);
        Self::insert(db, &data).await
    }

    pub async fn generate_many(
        &mut self,
        db: &PgPool,
        num: u32,
        ext: T,
    ) -> anyhow::Result<Vec<User>> {
        let data = UserDummy::generate_many(num);
        let mut result: Vec<User> = vec![];
        for (idx, item) in data.iter().enumerate() {
            let item = (self.modifier_many)(item, idx, ext.clone());
            result.push(Self::insert(db, &item).await?);
        }
        Ok(result)
    }
}

#[derive(Debug, Dummy, Clone)]
struct UserDummy {
    #[dummy(faker = "SafeEmail()")]
    pub email: String,
    #[dummy(faker = "FirstName()")]
    pub first_name: String,
    #[dummy(faker = "LastName()")]
    pub last_name: String,
    #[dummy(faker = "CountryName()")]
    pub country: Option<String>,
    #[dummy(faker = "CityName()")]
    pub city: Option<String>,
    #[dummy(faker = "PhoneNumber()")]
    pub phone_number: Option<String>,
}

impl UserDummy {
    fn into_fields(self) -> UserFields {
        UserFields {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            country: self.country,
            city: self.city,
            phone_number: self.phone_number,
            profile_picture: None,
        }
    }

    pub fn generate_one() -> UserFields {
        Faker.fake::<UserDummy>().into_fields()
    }

    // index prefix keeps emails unique within a batch
    pub fn generate_many(num: u32) -> Vec<UserFields> {
        let mut result: Vec<UserFields> = vec![];
        for idx in 0..num {
            let mut fields = Faker.fake::<Self>().into_fields();
            fields.email = format!("{}.{}", idx, fields.email);
            result.push(fields);
        }
        result
    }
}
