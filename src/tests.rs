//! Shared test fixtures and the end-to-end suite.

use serde_json::Value;

use crate::convert::Converter;
use crate::error::MarshalError;
use crate::marshal::{Denormalizer, Normalizer};
use crate::options::SerializerOptions;
use crate::value::{PropRef, PropValue};

// -----------------------------------------------------------------------------
// Fixtures

// A timestamp kept as its ISO-8601 text, marshalled field-by-field through a
// converter instead of a binding table.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Date {
    pub(crate) iso: String,
}

impl Date {
    pub(crate) fn new(iso: &str) -> Self {
        Self {
            iso: iso.to_string(),
        }
    }
}

pub(crate) struct DateConverter;

impl Converter for DateConverter {
    fn to_tree(
        &self,
        value: PropRef<'_>,
        _serializer: &Normalizer,
        _options: &SerializerOptions,
    ) -> Result<Option<Value>, MarshalError> {
        match value {
            PropRef::Missing => Ok(None),
            PropRef::Null => Ok(Some(Value::Null)),
            other => match other.downcast_ref::<Date>() {
                Some(date) => Ok(Some(Value::String(date.iso.clone()))),
                None => Err(MarshalError::Conversion("expected a date".to_string())),
            },
        }
    }

    fn from_tree(
        &self,
        value: Option<&Value>,
        _deserializer: &Denormalizer,
        _options: &SerializerOptions,
    ) -> Result<PropValue, MarshalError> {
        match value {
            None => Ok(PropValue::Missing),
            Some(Value::Null) => Ok(PropValue::Null),
            Some(Value::String(text)) => Ok(PropValue::Object(Box::new(Date::new(text)))),
            Some(other) => Err(MarshalError::Conversion(format!(
                "cannot read `{other}` as a date"
            ))),
        }
    }
}

// -----------------------------------------------------------------------------
// End-to-end

#[cfg(feature = "auto_register")]
mod e2e {
    use core::any::Any;

    use serde_json::{Value, json};

    use super::{Date, DateConverter};
    use crate::marshal::{Denormalizer, Normalizer};
    use crate::marshaller::Marshaller;
    use crate::options::SerializerOptions;
    use crate::registry::{
        BindingRegistry, PropertyBinding, TypeBindings, TypeSelector, TypeToken,
    };
    use crate::value::{PropRef, PropValue};

    #[derive(Debug, PartialEq, Default)]
    struct Address {
        street: Option<String>,
        zip_code: Option<u32>,
        city: Option<String>,
        country: Option<String>,
    }

    #[derive(Debug, PartialEq, Default)]
    struct Car {
        name: Option<String>,
        seating_capacity: Option<u32>,
    }

    #[derive(Debug, PartialEq, Default)]
    struct Truck {
        name: Option<String>,
        payload_capacity: Option<u32>,
    }

    // The common driver shape, embedded by both concrete driver kinds.
    #[derive(Default)]
    struct Driver {
        name: Option<String>,
        address: Option<Address>,
        vehicles: Vec<Box<dyn Any>>,
        created_at: Option<Date>,
        age: Option<u32>,
        size: Option<u32>,
    }

    #[derive(Default)]
    struct Particulier(Driver);

    #[derive(Default)]
    struct Pro(Driver);

    trait HasDriver: Any + Default {
        fn driver(&self) -> &Driver;
        fn driver_mut(&mut self) -> &mut Driver;
    }

    impl HasDriver for Particulier {
        fn driver(&self) -> &Driver {
            &self.0
        }
        fn driver_mut(&mut self) -> &mut Driver {
            &mut self.0
        }
    }

    impl HasDriver for Pro {
        fn driver(&self) -> &Driver {
            &self.0
        }
        fn driver_mut(&mut self) -> &mut Driver {
            &mut self.0
        }
    }

    fn address_bindings() -> TypeBindings {
        TypeBindings::of::<Address>()
            .binding(PropertyBinding::new(
                "street",
                |a: &Address| PropRef::opt_scalar(&a.street),
                |a: &mut Address, value| {
                    a.street = value.opt_decode()?;
                    Ok(())
                },
            ))
            .binding(
                PropertyBinding::new(
                    "zip_code",
                    |a: &Address| PropRef::opt_scalar(&a.zip_code),
                    |a: &mut Address, value| {
                        a.zip_code = value.opt_decode()?;
                        Ok(())
                    },
                )
                .field("zipCode"),
            )
            .binding(PropertyBinding::new(
                "city",
                |a: &Address| PropRef::opt_scalar(&a.city),
                |a: &mut Address, value| {
                    a.city = value.opt_decode()?;
                    Ok(())
                },
            ))
            .binding(PropertyBinding::new(
                "country",
                |a: &Address| PropRef::opt_scalar(&a.country),
                |a: &mut Address, value| {
                    a.country = value.opt_decode()?;
                    Ok(())
                },
            ))
    }

    fn car_bindings() -> TypeBindings {
        TypeBindings::of::<Car>()
            .supports(|data| data.get("type").and_then(Value::as_str) == Some("CAR"))
            .binding(PropertyBinding::new(
                "name",
                |c: &Car| PropRef::opt_scalar(&c.name),
                |c: &mut Car, value| {
                    c.name = value.opt_decode()?;
                    Ok(())
                },
            ))
            .binding(
                PropertyBinding::new(
                    "seating_capacity",
                    |c: &Car| PropRef::opt_scalar(&c.seating_capacity),
                    |c: &mut Car, value| {
                        c.seating_capacity = value.opt_decode()?;
                        Ok(())
                    },
                )
                .field("seatingCapacity"),
            )
    }

    fn truck_bindings() -> TypeBindings {
        TypeBindings::of::<Truck>()
            .supports(|data| data.get("type").and_then(Value::as_str) == Some("TRUCK"))
            .binding(PropertyBinding::new(
                "name",
                |t: &Truck| PropRef::opt_scalar(&t.name),
                |t: &mut Truck, value| {
                    t.name = value.opt_decode()?;
                    Ok(())
                },
            ))
            .binding(
                PropertyBinding::new(
                    "payload_capacity",
                    |t: &Truck| PropRef::opt_scalar(&t.payload_capacity),
                    |t: &mut Truck, value| {
                        t.payload_capacity = value.opt_decode()?;
                        Ok(())
                    },
                )
                .field("payloadCapacity"),
            )
    }

    fn driver_bindings<T: HasDriver>() -> TypeBindings {
        TypeBindings::of::<T>()
            .binding(PropertyBinding::new(
                "name",
                |d: &T| PropRef::opt_scalar(&d.driver().name),
                |d: &mut T, value| {
                    d.driver_mut().name = value.opt_decode()?;
                    Ok(())
                },
            ))
            .binding(
                PropertyBinding::new(
                    "address",
                    |d: &T| match &d.driver().address {
                        Some(address) => PropRef::object(address),
                        None => PropRef::Missing,
                    },
                    |d: &mut T, value| {
                        d.driver_mut().address = value.opt_downcast()?;
                        Ok(())
                    },
                )
                .nested(|| TypeSelector::of::<Address>()),
            )
            .binding(
                PropertyBinding::new(
                    "vehicles",
                    |d: &T| {
                        if d.driver().vehicles.is_empty() {
                            PropRef::Missing
                        } else {
                            PropRef::any_list(d.driver().vehicles.iter().map(|b| &**b))
                        }
                    },
                    |d: &mut T, value| {
                        d.driver_mut().vehicles = match value {
                            PropValue::Missing | PropValue::Null => Vec::new(),
                            other => other
                                .into_list()?
                                .into_iter()
                                .map(PropValue::into_any)
                                .collect::<Result<Vec<_>, _>>()?,
                        };
                        Ok(())
                    },
                )
                .nested(|| {
                    TypeSelector::candidates([TypeToken::of::<Car>(), TypeToken::of::<Truck>()])
                }),
            )
            .binding(
                PropertyBinding::new(
                    "created_at",
                    |d: &T| match &d.driver().created_at {
                        Some(date) => PropRef::object(date),
                        None => PropRef::Missing,
                    },
                    |d: &mut T, value| {
                        d.driver_mut().created_at = value.opt_downcast()?;
                        Ok(())
                    },
                )
                .field("createdAt")
                .converter(|| Box::new(DateConverter)),
            )
            .binding(
                PropertyBinding::new(
                    "age",
                    |d: &T| PropRef::opt_scalar(&d.driver().age),
                    |d: &mut T, value| {
                        d.driver_mut().age = value.opt_decode()?;
                        Ok(())
                    },
                )
                .group("WithAge"),
            )
            .binding(
                PropertyBinding::new(
                    "size",
                    |d: &T| PropRef::opt_scalar(&d.driver().size),
                    |d: &mut T, value| {
                        d.driver_mut().size = value.opt_decode()?;
                        Ok(())
                    },
                )
                .group("WithSize"),
            )
    }

    fn particulier_bindings() -> TypeBindings {
        driver_bindings::<Particulier>()
            .supports(|data| data.get("type").and_then(Value::as_str) == Some("PARTICULIER"))
    }

    fn pro_bindings() -> TypeBindings {
        driver_bindings::<Pro>()
            .supports(|data| data.get("type").and_then(Value::as_str) == Some("PRO"))
    }

    crate::submit_bindings!(address_bindings);
    crate::submit_bindings!(car_bindings);
    crate::submit_bindings!(truck_bindings);
    crate::submit_bindings!(particulier_bindings);
    crate::submit_bindings!(pro_bindings);

    fn marshaller() -> Marshaller {
        let registry = BindingRegistry::with_submitted().unwrap().into_shared();
        Marshaller::builder()
            .normalizer(Normalizer::new(registry.clone()))
            .denormalizer(Denormalizer::new(registry))
            .build()
            .unwrap()
    }

    fn vehicle_data() -> Value {
        json!([
            {
                "name": "Passat",
                "type": "CAR",
                "seatingCapacity": 4
            },
            {
                "name": "Renault Truck",
                "type": "TRUCK",
                "payloadCapacity": 3
            },
            {
                "name": "Renault Truck",
                "type": "CHARETTE",
                "payloadCapacity": 3
            }
        ])
    }

    fn drivers_data() -> Value {
        let vehicles = vehicle_data();
        json!([
            {
                "name": "Jean Claude",
                "type": "PARTICULIER",
                "vehicles": [vehicles[0].clone()],
                "address": {
                    "street": "7th My Street",
                    "zipCode": 51000,
                    "city": "BeerCity",
                    "country": "France"
                },
                "createdAt": "2022-04-26T13:39:16.271Z"
            },
            {
                "name": "Michel",
                "type": "PRO",
                "vehicles": vehicles.clone(),
                "address": {
                    "street": "8th My Street",
                    "zipCode": 51000,
                    "city": "BeerCity",
                    "country": "France"
                },
                "createdAt": "2021-04-26T13:39:16.271Z"
            }
        ])
    }

    fn candidates() -> [TypeToken; 2] {
        [TypeToken::of::<Particulier>(), TypeToken::of::<Pro>()]
    }

    #[test]
    fn deserializes_data_into_drivers() {
        let marshaller = marshaller();
        let drivers = marshaller
            .deserialize_all(candidates(), &drivers_data())
            .unwrap();
        assert_eq!(drivers.len(), 2);

        let first = drivers[0]
            .as_ref()
            .unwrap()
            .downcast_ref::<Particulier>()
            .unwrap();
        assert_eq!(first.0.name.as_deref(), Some("Jean Claude"));
        assert_eq!(
            first.0.created_at,
            Some(Date::new("2022-04-26T13:39:16.271Z"))
        );
        let address = first.0.address.as_ref().unwrap();
        assert_eq!(address.street.as_deref(), Some("7th My Street"));
        assert_eq!(address.zip_code, Some(51000));
        assert_eq!(address.city.as_deref(), Some("BeerCity"));
        assert_eq!(address.country.as_deref(), Some("France"));
        assert_eq!(first.0.vehicles.len(), 1);
        let car = first.0.vehicles[0].downcast_ref::<Car>().unwrap();
        assert_eq!(car.name.as_deref(), Some("Passat"));
        assert_eq!(car.seating_capacity, Some(4));

        let second = drivers[1].as_ref().unwrap().downcast_ref::<Pro>().unwrap();
        assert_eq!(second.0.name.as_deref(), Some("Michel"));
        assert_eq!(
            second.0.created_at,
            Some(Date::new("2021-04-26T13:39:16.271Z"))
        );
        // The CHARETTE entry resolves to no candidate and is dropped.
        assert_eq!(second.0.vehicles.len(), 2);
        let car = second.0.vehicles[0].downcast_ref::<Car>().unwrap();
        assert_eq!(car.name.as_deref(), Some("Passat"));
        let truck = second.0.vehicles[1].downcast_ref::<Truck>().unwrap();
        assert_eq!(truck.name.as_deref(), Some("Renault Truck"));
        assert_eq!(truck.payload_capacity, Some(3));
    }

    #[test]
    fn serializes_drivers_back_to_their_data() {
        let marshaller = marshaller();
        let drivers = marshaller
            .deserialize_all(candidates(), &drivers_data())
            .unwrap();

        let refs = PropRef::List(
            drivers
                .iter()
                .map(|driver| {
                    let any: &dyn Any = driver.as_ref().unwrap().as_ref();
                    PropRef::Object(any)
                })
                .collect(),
        );
        let serialized = marshaller
            .serialize_seq(refs, &SerializerOptions::new())
            .unwrap();

        // Discriminators are write-side only and the unresolvable third
        // vehicle is gone.
        assert_eq!(
            serialized,
            json!([
                {
                    "name": "Jean Claude",
                    "vehicles": [{"name": "Passat", "seatingCapacity": 4}],
                    "address": {
                        "street": "7th My Street",
                        "zipCode": 51000,
                        "city": "BeerCity",
                        "country": "France"
                    },
                    "createdAt": "2022-04-26T13:39:16.271Z"
                },
                {
                    "name": "Michel",
                    "vehicles": [
                        {"name": "Passat", "seatingCapacity": 4},
                        {"name": "Renault Truck", "payloadCapacity": 3}
                    ],
                    "address": {
                        "street": "8th My Street",
                        "zipCode": 51000,
                        "city": "BeerCity",
                        "country": "France"
                    },
                    "createdAt": "2021-04-26T13:39:16.271Z"
                }
            ])
        );
    }

    #[test]
    fn group_filtering_is_a_pure_subset() {
        let marshaller = marshaller();
        let pro = Pro(Driver {
            name: Some("Michel".to_string()),
            age: Some(42),
            size: Some(180),
            ..Driver::default()
        });

        assert_eq!(
            marshaller
                .serialize_with(&pro, &SerializerOptions::groups(["WithSize", "WithAge"]))
                .unwrap(),
            json!({"age": 42, "size": 180})
        );

        assert_eq!(
            marshaller
                .serialize_with(&pro, &SerializerOptions::group("WithAge"))
                .unwrap(),
            json!({"age": 42})
        );

        assert_eq!(
            marshaller.serialize(&pro).unwrap(),
            json!({"name": "Michel", "age": 42, "size": 180})
        );
    }

    #[test]
    fn round_trips_a_fully_reversible_instance() {
        let marshaller = marshaller();
        let particulier = Particulier(Driver {
            name: Some("Jean Claude".to_string()),
            address: Some(Address {
                street: Some("7th My Street".to_string()),
                zip_code: Some(51000),
                city: Some("BeerCity".to_string()),
                country: Some("France".to_string()),
            }),
            created_at: Some(Date::new("2022-04-26T13:39:16.271Z")),
            ..Driver::default()
        });

        let tree = marshaller.serialize(&particulier).unwrap();
        let back: Particulier = marshaller
            .deserialize_as(TypeToken::of::<Particulier>(), &tree)
            .unwrap()
            .unwrap();

        assert_eq!(back.0.name, particulier.0.name);
        assert_eq!(back.0.address, particulier.0.address);
        assert_eq!(back.0.created_at, particulier.0.created_at);
        assert_eq!(back.0.age, None);
    }
}
