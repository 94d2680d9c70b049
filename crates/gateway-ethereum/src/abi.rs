//! AgriSupplyChain contract bindings
//!
//! The interface must match the deployed contract's ABI exactly.

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    contract AgriSupplyChain {
        struct CropDetails {
            string name;
            string cropType;
            uint256 quantity;
            uint256 price;
            string harvestDate;
            string fertilizerUsed;
            string pesticideUsed;
            string qualityGrade;
            string imageHash;
            string geoLocation;
        }

        function owner() external view returns (address);

        function cropCount() external view returns (uint256);

        function crops(uint256) external view returns (
            uint256 id,
            address farmer,
            CropDetails details,
            uint8 status,
            address buyer
        );

        function inspectors(address) external view returns (bool);

        function addInspector(address _inspector) external;

        function uploadCrop(
            string _name,
            string _cropType,
            uint256 _quantity,
            uint256 _price,
            string _harvestDate,
            string _fertilizerUsed,
            string _pesticideUsed,
            string _qualityGrade,
            string _imageHash,
            string _geoLocation
        ) external;

        function approveCrop(uint256 _id) external;

        function buyCrop(uint256 _id) external payable;
    }
}
