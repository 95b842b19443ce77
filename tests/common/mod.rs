#![allow(dead_code)]

use std::path::{Path, PathBuf};

use addressbook_convert::config::Config;
use addressbook_convert::contact::Contact;
use tempfile::TempDir;
use tokio::fs;

/// Test fixture paths
pub struct TestFixtures {
    pub fixtures_dir: PathBuf,
}

impl TestFixtures {
    pub fn new() -> Self {
        let fixtures_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures");

        Self { fixtures_dir }
    }

    /// Three contacts, one with a region and two without
    pub fn address_book_xml(&self) -> PathBuf {
        self.fixtures_dir.join("ab.xml")
    }

    /// Two contacts, the second with null optional fields
    pub fn contacts_json(&self) -> PathBuf {
        self.fixtures_dir.join("contacts.json")
    }

    /// Well-formed but missing the required Phone element
    pub fn missing_phone_xml(&self) -> PathBuf {
        self.fixtures_dir.join("missing_phone.xml")
    }

    pub fn bundled_schema(&self) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("schemas")
            .join("contact.xsd")
    }
}

/// A scratch project with `input/` and `output/` directories
pub struct Workspace {
    pub temp_dir: TempDir,
}

impl Workspace {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("input"))
            .await
            .unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn input_dir(&self) -> PathBuf {
        self.root().join("input")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root().join("output")
    }

    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.paths.input_dir = self.input_dir();
        config.paths.output_dir = self.output_dir();
        config
    }

    /// Copy a fixture into `input/` under its own name
    pub async fn add_input(&self, fixture: &Path) -> PathBuf {
        let target = self.input_dir().join(fixture.file_name().unwrap());
        fs::copy(fixture, &target).await.unwrap();
        target
    }

    pub async fn write_input(&self, name: &str, content: &str) -> PathBuf {
        let target = self.input_dir().join(name);
        fs::write(&target, content).await.unwrap();
        target
    }

    pub async fn read_output(&self, name: &str) -> String {
        fs::read_to_string(self.output_dir().join(name))
            .await
            .unwrap()
    }
}

/// Five distinct contacts covering every optional-field combination
pub fn sample_contacts() -> Vec<Contact> {
    vec![
        Contact::builder("ALFKI")
            .company_name("Alfreds Futterkiste")
            .contact_name("Maria Anders")
            .contact_title("Sales Representative")
            .address("Obere Str. 57")
            .city("Berlin")
            .email("maria.anders@alfreds.example")
            .postal_code("12209")
            .country("Germany")
            .phone("030-0074321")
            .fax("030-0076545")
            .build(),
        Contact::builder("BONAP")
            .company_name("Bon app'")
            .contact_name("Laurence Lebihan")
            .contact_title("Owner")
            .address("12, rue des Bouchers")
            .city("Marseille")
            .email("laurence@bonapp.example")
            .postal_code("13008")
            .country("France")
            .phone("91.24.45.40")
            .fax("91.24.45.41")
            .build(),
        Contact::builder("GREAL")
            .company_name("Great Lakes Food Market")
            .contact_name("Howard Snyder")
            .contact_title("Marketing Manager")
            .address("2732 Baker Blvd.")
            .city("Eugene")
            .email("howard@greatlakes.example")
            .region("OR")
            .postal_code("97403")
            .country("USA")
            .phone("(503) 555-7555")
            .build(),
        Contact::builder("HUNGO")
            .company_name("Hungry Owl All-Night Grocers")
            .contact_name("Patricia McKenna")
            .contact_title("Sales Associate")
            .address("8 Johnstown Road")
            .city("Cork")
            .email("patricia@hungryowl.example")
            .region("Co. Cork")
            .country("Ireland")
            .phone("2967 542")
            .fax("2967 3333")
            .build(),
        Contact::builder("LAZYK")
            .company_name("Lazy K Kountry Store & <Deli>")
            .contact_name("John Steel")
            .contact_title("Marketing Manager")
            .address("12 Orchestra Terrace")
            .city("Walla Walla")
            .email("john@lazyk.example")
            .region("")
            .postal_code("99362")
            .country("USA")
            .phone("(509) 555-7969")
            .fax("")
            .build(),
    ]
}
